use serde::{Deserialize, Serialize};

use crate::auth::UserRole;

/// One entry of the side navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub route: String,
    pub icon: String,
}

impl MenuItem {
    fn new(key: &str, label: &str, route: &str, icon: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            route: route.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Menu entries visible to `role`, in display order. Sign-out is always last.
pub fn menu_for_role(role: UserRole) -> Vec<MenuItem> {
    let mut items = match role {
        UserRole::Doctor => vec![
            MenuItem::new("calendar", "Calendar", "/calendar", "calendar"),
            MenuItem::new("patients", "My Patients", "/patients", "people"),
        ],
        UserRole::Patient => vec![
            MenuItem::new("home", "Home", "/home", "home"),
            MenuItem::new("reports", "My Reports", "/reports", "document-text"),
        ],
        UserRole::Other => Vec::new(),
    };

    items.push(MenuItem::new("profile", "Profile", "/profile", "person"));
    items.push(MenuItem::new("sign-out", "Sign Out", "/sign-out", "log-out"));
    items
}
