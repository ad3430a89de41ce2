use crate::leads::domain::CanonicalField;

pub(crate) const STANDARD_TABLE_VERSION: u32 = 1;

/// Column spellings seen in ad-platform, CRM, and data-vendor exports.
pub(crate) const STANDARD_ALIASES: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::FirstName,
        &["first name", "firstname", "fname", "given name", "borrower first name"],
    ),
    (
        CanonicalField::LastName,
        &["last name", "lastname", "lname", "surname", "family name", "borrower last name"],
    ),
    (
        CanonicalField::Email,
        &["e-mail", "email address", "email_addr", "contact email", "borrower email"],
    ),
    (
        CanonicalField::Phone,
        &["phone number", "phone_number", "mobile", "cell", "cell phone", "telephone", "primary phone"],
    ),
    (
        CanonicalField::State,
        &["st", "state code", "property state", "region", "province"],
    ),
    (
        CanonicalField::Occupancy,
        &["occupancy type", "occupancy status", "property use", "intended use"],
    ),
    (
        CanonicalField::LoanPurpose,
        &["purpose", "loan type", "loan program", "product", "looking for"],
    ),
    (
        CanonicalField::PropertyValue,
        &["home value", "estimated value", "est value", "property_val", "value", "arv", "purchase price"],
    ),
    (
        CanonicalField::CreditBand,
        &["credit range", "credit tier", "approx credit", "credit rating", "credit profile"],
    ),
    (
        CanonicalField::CreditScore,
        &["fico", "fico score", "credit", "credit_score_numeric", "mid score"],
    ),
    (
        CanonicalField::LiquidAssets,
        &["assets", "liquidity", "cash reserves", "reserves", "cash on hand", "liquid"],
    ),
    (
        CanonicalField::Cltv,
        &["ltv", "combined ltv", "combined loan to value", "loan to value", "cltv %"],
    ),
    (
        CanonicalField::Source,
        &["lead source", "lead_src", "utm source", "channel", "campaign source", "platform"],
    ),
    (
        CanonicalField::Notes,
        &["note", "comments", "comment", "remarks", "message", "description"],
    ),
];
