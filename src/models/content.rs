use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Translated sub-objects keyed by language code (`en`, `ar`, ...).
pub type Translations<T> = BTreeMap<String, T>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectText {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryText {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCategory {
    pub id: i64,
    #[serde(default)]
    pub translations: Translations<CategoryText>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectImage {
    pub id: i64,
    pub image: String,
    #[serde(default)]
    pub project: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    #[serde(default)]
    pub translations: Translations<ProjectText>,
    pub category: Option<ProjectCategory>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberText {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    #[serde(default)]
    pub translations: Translations<MemberText>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedImage {
    pub id: i64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedProject {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Option<String>,
    pub image: String,
    pub images: Vec<LocalizedImage>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedMember {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub photo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedClient {
    pub id: String,
    pub name: String,
    pub logo: String,
}
