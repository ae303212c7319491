//! Portal entry points and the role each one admits.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use sgms_core::{Identity, Role};

/// One of the four login portals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Admin,
    Manager,
    Client,
    Guard,
}

impl Portal {
    pub const ALL: [Portal; 4] = [Portal::Admin, Portal::Manager, Portal::Client, Portal::Guard];

    /// Resolve a portal by name. Unknown names fall back to the client portal.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" => Portal::Admin,
            "manager" | "supervisor" => Portal::Manager,
            "guard" | "worker" => Portal::Guard,
            _ => Portal::Client,
        }
    }

    /// The portal a given role is supposed to sign in through.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Portal::Admin,
            Role::Supervisor => Portal::Manager,
            Role::Guard => Portal::Guard,
            Role::Client => Portal::Client,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Portal::Admin => "admin",
            Portal::Manager => "manager",
            Portal::Client => "client",
            Portal::Guard => "guard",
        }
    }

    pub fn expected_role(&self) -> Role {
        match self {
            Portal::Admin => Role::Admin,
            Portal::Manager => Role::Supervisor,
            Portal::Client => Role::Client,
            Portal::Guard => Role::Guard,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Portal::Admin => "Admin Portal",
            Portal::Manager => "Manager Portal",
            Portal::Client => "Client Portal",
            Portal::Guard => "Guard Portal",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Portal::Admin => "System Administration Access",
            Portal::Manager => "Supervisor & Operations Management",
            Portal::Client => "Security Services Portal",
            Portal::Guard => "Field Operations & Attendance",
        }
    }

    /// Where a successful login through this portal navigates.
    pub fn redirect_route(&self) -> &'static str {
        match self {
            Portal::Admin => "/dashboard/admin",
            Portal::Manager => "/dashboard/manager",
            Portal::Client => "/dashboard/client",
            Portal::Guard => "/dashboard/guard",
        }
    }

    /// Check that `identity` belongs to this portal.
    pub fn check(&self, identity: &Identity) -> Result<(), RoleMismatch> {
        if identity.role == self.expected_role() {
            Ok(())
        } else {
            Err(RoleMismatch {
                portal: *self,
                actual: identity.role,
            })
        }
    }
}

impl core::fmt::Display for Portal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Portal {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Portal::from_name(s))
    }
}

/// Authenticated identity entered through the wrong portal.
///
/// This is a navigation problem, not a credential problem: the session is
/// valid and stays that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMismatch {
    pub portal: Portal,
    pub actual: Role,
}

impl core::fmt::Display for RoleMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "This account does not belong to the {}. Please use the {}.",
            self.portal.title(),
            self.correct_portal().title()
        )
    }
}

impl std::error::Error for RoleMismatch {}

impl RoleMismatch {
    /// Portal the identity should have used.
    pub fn correct_portal(&self) -> Portal {
        Portal::for_role(self.actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgms_core::UserId;

    fn identity(role: Role) -> Identity {
        Identity::new(UserId::new(5), "p@x.com", "P", role)
    }

    #[test]
    fn each_portal_admits_its_own_role() {
        for portal in Portal::ALL {
            assert!(portal.check(&identity(portal.expected_role())).is_ok());
            assert_eq!(Portal::for_role(portal.expected_role()), portal);
        }
    }

    #[test]
    fn mismatch_names_the_correct_portal() {
        let err = Portal::Client.check(&identity(Role::Guard)).unwrap_err();

        assert_eq!(err.correct_portal(), Portal::Guard);
        assert_eq!(
            err.to_string(),
            "This account does not belong to the Client Portal. Please use the Guard Portal."
        );
    }

    #[test]
    fn unknown_portal_names_fall_back_to_client() {
        assert_eq!(Portal::from_name("ADMIN"), Portal::Admin);
        assert_eq!(Portal::from_name("supervisor"), Portal::Manager);
        assert_eq!(Portal::from_name("nonsense"), Portal::Client);
        assert_eq!("guard".parse::<Portal>().unwrap(), Portal::Guard);
    }

    #[test]
    fn redirects_match_route_policy_landings() {
        let policy = crate::RoutePolicy::standard();
        for portal in Portal::ALL {
            assert_eq!(
                policy.landing(portal.expected_role()),
                Some(portal.redirect_route())
            );
        }
    }
}
