use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::chrome::SiteChrome;
use crate::home::FeatureCard;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AboutView {
    pub chrome: SiteChrome,
    pub title: &'static str,
    pub tagline: &'static str,
    pub mission: Vec<&'static str>,
    pub highlights: Vec<FeatureCard>,
    pub vision: Vec<&'static str>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/about", get(about_page))
}

async fn about_page() -> Json<AboutView> {
    Json(AboutView {
        chrome: SiteChrome::standard(),
        title: "About DreamDestination",
        tagline: "Your gateway to discovering the world's most incredible destinations",
        mission: vec![
            "DreamDestination is your trusted companion for exploring the world's most \
             beautiful and captivating places. We believe that travel enriches lives, broadens \
             perspectives, and creates memories that last a lifetime.",
            "Our mission is to inspire and empower travelers by providing comprehensive \
             information about destinations around the globe.",
        ],
        highlights: vec![
            FeatureCard {
                title: "Global Coverage",
                description: "Explore destinations from every corner of the world, from iconic \
                              landmarks to hidden gems.",
            },
            FeatureCard {
                title: "Curated Experiences",
                description: "Each destination is carefully selected and described to help you \
                              make informed travel decisions.",
            },
            FeatureCard {
                title: "Travel Inspiration",
                description: "Discover new places and get inspired to plan your next adventure \
                              with detailed location information.",
            },
            FeatureCard {
                title: "Community Focused",
                description: "We're building a community of passionate travelers who share a \
                              love for exploration and discovery.",
            },
        ],
        vision: vec![
            "We envision a world where everyone has the opportunity to explore, learn, and \
             grow through travel.",
            "Whether you're planning a weekend getaway or a once-in-a-lifetime journey, \
             DreamDestination is here to guide you every step of the way.",
        ],
    })
}
