use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::chrome::SiteChrome;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub chrome: SiteChrome,
    pub hero_title: &'static str,
    pub hero_subtitle: &'static str,
    pub features: Vec<FeatureCard>,
    pub cta_title: &'static str,
    pub cta_subtitle: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FeatureCard {
    pub title: &'static str,
    pub description: &'static str,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(home_page))
}

async fn home_page() -> Json<HomeView> {
    Json(HomeView {
        chrome: SiteChrome::standard(),
        hero_title: "Your Dream Destination Awaits",
        hero_subtitle: "Discover breathtaking locations around the globe. From pristine beaches \
                        to majestic mountains, find your perfect escape and create memories that \
                        last a lifetime.",
        features: vec![
            FeatureCard {
                title: "Global Destinations",
                description: "Access to stunning locations across every continent",
            },
            FeatureCard {
                title: "Curated Selection",
                description: "Hand-picked destinations for unforgettable experiences",
            },
            FeatureCard {
                title: "Expert Guidance",
                description: "Detailed information to help you plan your journey",
            },
            FeatureCard {
                title: "Memorable Moments",
                description: "Create lasting memories in the world's most beautiful places",
            },
        ],
        cta_title: "Ready to Start Your Adventure?",
        cta_subtitle: "Browse our collection of stunning destinations and find the perfect place \
                       for your next journey.",
    })
}
