use gatehouse_auth::Identity;

/// Authenticated caller, inserted by `require_auth` / `require_roles`.
///
/// Handlers behind those layers can rely on it being present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

/// Caller on an optional-auth route: `None` means anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaybeUser(pub Option<Identity>);

impl MaybeUser {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}
