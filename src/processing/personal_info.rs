use chrono::NaiveDate;
use crate::models::{MrzRecord, PersonalInfo};
use crate::utils::dates::{resolve_birth_date, resolve_expiry_date};

/// Decode the coded fields of a record into holder details.
pub fn extract_personal_info(record: &MrzRecord, today: NaiveDate) -> PersonalInfo {
    PersonalInfo {
        document_type: record.document_type(),
        document_number: record.document_number.replace('<', ""),
        surname: record.surname(),
        given_names: record.given_names(),
        full_name: record.full_name(),
        nationality: record.nationality.clone(),
        issuing_state: record.issuing_state.clone(),
        sex: record.sex,
        date_of_birth: resolve_birth_date(&record.date_of_birth, today),
        date_of_expiry: resolve_expiry_date(&record.date_of_expiry, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentType, Sex};
    use crate::parse_mrz;

    #[test]
    fn test_td1_personal_info() {
        let record = parse_mrz(
            "I<UTOD231458907<<<<<<<<<<<<<<<\n7408122F1204159UTO<<<<<<<<<<<6\nERIKSSON<<ANNA<MARIA<<<<<<<<<<",
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let info = extract_personal_info(&record, today);
        assert_eq!(info.document_type, DocumentType::IdCard);
        assert_eq!(info.document_number, "D23145890");
        assert_eq!(info.surname, "ERIKSSON");
        assert_eq!(info.given_names, "ANNA MARIA");
        assert_eq!(info.full_name, "ANNA MARIA ERIKSSON");
        assert_eq!(info.sex, Sex::Female);
        assert_eq!(info.date_of_birth, NaiveDate::from_ymd_opt(1974, 8, 12));
        assert_eq!(info.date_of_expiry, NaiveDate::from_ymd_opt(2012, 4, 15));
    }

    #[test]
    fn test_personal_info_serializes_dates() {
        let record = parse_mrz(
            "I<UTOD231458907<<<<<<<<<<<<<<<\n7408122F1204159UTO<<<<<<<<<<<6\nERIKSSON<<ANNA<MARIA<<<<<<<<<<",
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let json = serde_json::to_value(extract_personal_info(&record, today)).unwrap();
        assert_eq!(json["dateOfBirth"], "1974-08-12");
        assert_eq!(json["dateOfExpiry"], "2012-04-15");
        assert_eq!(json["documentType"], "ID_CARD");
    }
}
