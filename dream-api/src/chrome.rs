use serde::Serialize;

/// Navigation and footer shared by every page view model.
#[derive(Debug, Clone, Serialize)]
pub struct SiteChrome {
    pub brand: &'static str,
    pub nav: Vec<NavLink>,
    pub footer: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

impl SiteChrome {
    pub fn standard() -> Self {
        Self {
            brand: "DreamDestination",
            nav: vec![
                NavLink { label: "Home", href: "/" },
                NavLink { label: "Destinations", href: "/destinations" },
                NavLink { label: "Booking", href: "/booking" },
                NavLink { label: "About", href: "/about" },
                NavLink { label: "Contact", href: "/contact" },
                NavLink { label: "Login", href: "/login" },
            ],
            footer: "DreamDestination. Travel far, travel well.",
        }
    }
}
