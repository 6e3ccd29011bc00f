//! Request and response bodies of the backend REST contract.

use chrono::{DateTime, Utc};
use recipebook_common::CatalogId;
use recipebook_common::recipe::lenient_timestamp;
use serde::{Deserialize, Serialize};

/// Acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a successful `POST /recipes` or `PUT /recipes/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitReceipt {
    #[serde(default)]
    pub message: Option<String>,
    /// Id of the created recipe; update responses may omit it.
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedIngredient {
    pub id: CatalogId,
}

/// `POST /brands` answers with `brand_id`; older backends answer with `id`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedBrand {
    #[serde(default)]
    pub brand_id: Option<CatalogId>,
    #[serde(default)]
    pub id: Option<CatalogId>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewIngredient<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewBrand<'a> {
    pub name: &'a str,
    pub ingredient_id: &'a CatalogId,
    pub is_verified: bool,
}

/// The logged-in user as reported by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserInfo {
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.email.clone()
        } else {
            full
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthResponse {
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A family the current user belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_role: Option<String>,
}

impl Family {
    pub fn is_admin(&self) -> bool {
        self.user_role.as_deref() == Some("admin")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedFamily {
    pub family: Family,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewFamily<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, alias = "relationship")]
    pub relation: Option<String>,
    #[serde(default)]
    pub invitation_status: Option<String>,
}

impl FamilyMember {
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            full
        } else {
            self.email.clone().unwrap_or_else(|| self.id.clone())
        }
    }
}

/// Invitation sent to `POST /families/{id}/members`.
#[derive(Debug, Clone, Serialize)]
pub struct MemberInvite {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AddedMember {
    pub member: FamilyMember,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_brand_accepts_either_id_field() {
        let a: CreatedBrand = serde_json::from_str(r#"{"brand_id":"b1"}"#).unwrap();
        assert_eq!(a.brand_id, Some(CatalogId::new("b1")));
        let b: CreatedBrand = serde_json::from_str(r#"{"id":"b2"}"#).unwrap();
        assert_eq!(b.id, Some(CatalogId::new("b2")));
    }

    #[test]
    fn test_user_display_name_falls_back_to_email() {
        let user: UserInfo =
            serde_json::from_str(r#"{"id":"u1","email":"a@b.c","first_name":"Asha"}"#).unwrap();
        assert_eq!(user.display_name(), "Asha");

        let bare: UserInfo = serde_json::from_str(r#"{"id":"u2","email":"x@y.z"}"#).unwrap();
        assert_eq!(bare.display_name(), "x@y.z");
    }

    #[test]
    fn test_member_relationship_alias() {
        let member: FamilyMember = serde_json::from_str(
            r#"{"id":"m1","relationship":"sister","invitation_status":"pending","email":"s@x.y"}"#,
        )
        .unwrap();
        assert_eq!(member.relation.as_deref(), Some("sister"));
        assert_eq!(member.display_name(), "s@x.y");
    }

    #[test]
    fn test_invite_skips_absent_optionals() {
        let invite = MemberInvite {
            email: "g@x.y".into(),
            name: "Gran".into(),
            phone: None,
            relation: Some("grandmother".into()),
        };
        let value = serde_json::to_value(&invite).unwrap();
        assert!(value.get("phone").is_none());
        assert_eq!(value["relation"], "grandmother");
    }

    #[test]
    fn test_family_admin_role() {
        let family: Family = serde_json::from_str(
            r#"{"id":"f1","name":"Rao","created_at":"2024-01-02T03:04:05","user_role":"admin"}"#,
        )
        .unwrap();
        assert!(family.is_admin());
        assert!(family.created_at.is_some());
    }
}
