//! Payload builder - assembles validated fields into the token claim set

use super::validator::ValidatedFields;
use crate::{expiry::to_epoch_seconds, types::Claims};

/// Builds [`Claims`] from fields that already passed validation
///
/// Deterministic: the same fields always give the same claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadBuilder;

impl PayloadBuilder {
    /// Create a new payload builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the claim set
    #[must_use]
    pub fn build(&self, fields: &ValidatedFields) -> Claims {
        Claims {
            tenant_id: fields.tenant_id,
            user_id: fields.user_id.clone(),
            exp: to_epoch_seconds(&fields.expires_at),
            no_personal_space: fields.no_personal_space,
            plan_id: fields.plan_id,
            grant_access: (!fields.grantees.is_empty()).then(|| fields.grantees.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Grantee;
    use chrono::{DateTime, FixedOffset};

    fn fields() -> ValidatedFields {
        ValidatedFields {
            tenant_id: 42,
            user_id: "u1".to_string(),
            plan_id: None,
            no_personal_space: true,
            grantees: Vec::new(),
            expires_at: DateTime::parse_from_rfc3339("2030-01-01T13:00:00.750+00:00")
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn empty_grantees_and_plan_are_absent() {
        let claims = PayloadBuilder::new().build(&fields());
        assert_eq!(claims.plan_id, None);
        assert_eq!(claims.grant_access, None);
        assert_eq!(claims.tenant_id, 42);
        assert!(claims.no_personal_space);
    }

    #[test]
    fn exp_drops_fractional_seconds() {
        let claims = PayloadBuilder::new().build(&fields());
        assert_eq!(claims.exp, 1_893_502_800);
    }

    #[test]
    fn exp_is_independent_of_the_offset() {
        let mut shifted = fields();
        shifted.expires_at = shifted
            .expires_at
            .with_timezone(&FixedOffset::west_opt(5 * 3600).expect("offset"));
        assert_eq!(PayloadBuilder::new().build(&shifted).exp, 1_893_502_800);
    }

    #[test]
    fn grantees_and_plan_carry_through_in_order() {
        let mut f = fields();
        f.plan_id = Some(7);
        f.grantees = vec![
            Grantee { space_id: 3, role_id: 2 },
            Grantee { space_id: 1, role_id: 4 },
        ];
        let claims = PayloadBuilder::new().build(&f);
        assert_eq!(claims.plan_id, Some(7));
        assert_eq!(claims.grant_access, Some(f.grantees.clone()));
    }
}
