use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Legal form of an organisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgType {
    /// Private individual.
    #[default]
    Phys,
    /// Legal entity.
    Jur,
    /// Sole proprietor.
    Ip,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organisation {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub owner_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_path: Option<String>,
    pub balance: f64,
    pub org_type: OrgType,
    pub is_banned: bool,
    pub registration_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phys_face: Option<PhysFace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jur_face: Option<JurFace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_face: Option<IpFace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysFace {
    pub bic: String,
    pub checking_account: String,
    pub correspondent_account: String,
    pub fio: String,
    pub inn: String,
    pub passport_series: i64,
    pub passport_number: i64,
    pub passport_givenby: String,
    pub registration_address: String,
    pub post_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JurFace {
    pub acts_on_base: String,
    pub position: String,
    pub bic: String,
    pub checking_account: String,
    pub correspondent_account: String,
    pub full_organisation_name: String,
    pub short_organisation_name: String,
    pub inn: String,
    pub ogrn: String,
    pub kpp: String,
    pub jur_address: String,
    pub fact_address: String,
    pub post_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpFace {
    pub bic: String,
    pub ras_schot: String,
    pub kor_schot: String,
    pub fio: String,
    pub ip_svid_serial: i64,
    pub ip_svid_number: i64,
    pub ip_svid_givenby: String,
    pub inn: String,
    pub ogrn: String,
    pub jur_address: String,
    pub fact_address: String,
    pub post_address: String,
}

/// Registration documents an organisation can attach, grouped by legal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgDocType {
    PhysPassportPhoto,
    PhysPassportPropiska,
    PhysSvidUchet,
    JurRegSvid,
    JurSvidUchet,
    JurAppointmentProtocol,
    JurUsn,
    JurUstav,
    IpSvidUchet,
    IpPassportPhoto,
    IpPassportPropiska,
    IpUsn,
    IpOgrnip,
}

impl OrgDocType {
    pub const ALL: [OrgDocType; 13] = [
        OrgDocType::PhysPassportPhoto,
        OrgDocType::PhysPassportPropiska,
        OrgDocType::PhysSvidUchet,
        OrgDocType::JurRegSvid,
        OrgDocType::JurSvidUchet,
        OrgDocType::JurAppointmentProtocol,
        OrgDocType::JurUsn,
        OrgDocType::JurUstav,
        OrgDocType::IpSvidUchet,
        OrgDocType::IpPassportPhoto,
        OrgDocType::IpPassportPropiska,
        OrgDocType::IpUsn,
        OrgDocType::IpOgrnip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrgDocType::PhysPassportPhoto => "phys_passport_photo",
            OrgDocType::PhysPassportPropiska => "phys_passport_propiska",
            OrgDocType::PhysSvidUchet => "phys_svid_uchet",
            OrgDocType::JurRegSvid => "jur_reg_svid",
            OrgDocType::JurSvidUchet => "jur_svid_uchet",
            OrgDocType::JurAppointmentProtocol => "jur_appointment_protocol",
            OrgDocType::JurUsn => "jur_usn",
            OrgDocType::JurUstav => "jur_ustav",
            OrgDocType::IpSvidUchet => "ip_svid_uchet",
            OrgDocType::IpPassportPhoto => "ip_passport_photo",
            OrgDocType::IpPassportPropiska => "ip_passport_propiska",
            OrgDocType::IpUsn => "ip_usn",
            OrgDocType::IpOgrnip => "ip_ogrnip",
        }
    }

    pub fn org_type(&self) -> OrgType {
        match self {
            OrgDocType::PhysPassportPhoto
            | OrgDocType::PhysPassportPropiska
            | OrgDocType::PhysSvidUchet => OrgType::Phys,
            OrgDocType::JurRegSvid
            | OrgDocType::JurSvidUchet
            | OrgDocType::JurAppointmentProtocol
            | OrgDocType::JurUsn
            | OrgDocType::JurUstav => OrgType::Jur,
            _ => OrgType::Ip,
        }
    }

    /// Documents expected from an organisation of the given legal form.
    pub fn for_org_type(org_type: OrgType) -> Vec<OrgDocType> {
        Self::ALL
            .iter()
            .copied()
            .filter(|doc| doc.org_type() == org_type)
            .collect()
    }
}

impl fmt::Display for OrgDocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrgDocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|doc| doc.as_str() == s)
            .ok_or_else(|| format!("unknown document type: {s}"))
    }
}

/// A downloaded organisation document.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgDocument {
    pub doc_type: OrgDocType,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}
