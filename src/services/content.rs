use crate::models::{
    Client, Language, LocalizedClient, LocalizedImage, LocalizedMember, LocalizedProject, Project,
    TeamMember, Translations,
};

const FALLBACK_LANGUAGE: &str = "en";

/// Picks `field` from the active language, then English, then "".
/// Empty strings count as missing.
pub fn translated<T, F>(translations: &Translations<T>, language: Language, field: F) -> String
where
    F: Fn(&T) -> &str,
{
    [language.as_str(), FALLBACK_LANGUAGE]
        .iter()
        .filter_map(|code| translations.get(*code))
        .map(&field)
        .find(|value| !value.is_empty())
        .unwrap_or("")
        .to_string()
}

pub fn resolve_media_url(base_url: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with("http") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

pub fn localize_projects(
    projects: &[Project],
    language: Language,
    base_url: &str,
) -> Vec<LocalizedProject> {
    projects
        .iter()
        .map(|project| {
            let images: Vec<LocalizedImage> = project
                .images
                .iter()
                .map(|img| LocalizedImage {
                    id: img.id,
                    url: resolve_media_url(base_url, &img.image),
                })
                .collect();
            LocalizedProject {
                id: project.id.to_string(),
                title: translated(&project.translations, language, |t| t.title.as_str()),
                description: translated(&project.translations, language, |t| t.description.as_str()),
                category: project
                    .category
                    .as_ref()
                    .map(|c| translated(&c.translations, language, |t| t.name.as_str()))
                    .unwrap_or_default(),
                location: project.location.clone(),
                image: images.first().map(|i| i.url.clone()).unwrap_or_default(),
                images,
                created_at: project.created_at.clone(),
            }
        })
        .collect()
}

pub fn localize_team(
    members: &[TeamMember],
    language: Language,
    base_url: &str,
) -> Vec<LocalizedMember> {
    members
        .iter()
        .map(|member| LocalizedMember {
            id: member.id,
            name: translated(&member.translations, language, |t| t.name.as_str()),
            title: translated(&member.translations, language, |t| t.title.as_str()),
            bio: translated(&member.translations, language, |t| t.bio.as_str()),
            photo: resolve_media_url(base_url, member.photo.as_deref().unwrap_or("")),
        })
        .collect()
}

pub fn localize_clients(clients: &[Client], base_url: &str) -> Vec<LocalizedClient> {
    clients
        .iter()
        .map(|client| LocalizedClient {
            id: match &client.id {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            name: client.name.clone(),
            logo: resolve_media_url(base_url, client.logo.as_deref().unwrap_or("")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://content.example";

    fn project_json() -> &'static str {
        r#"[{
            "id": 4,
            "translations": {
                "en": {"title": "Expo Pavilion", "description": "Modular pavilion"},
                "ar": {"title": "جناح المعرض", "description": ""}
            },
            "category": {"id": 1, "translations": {"en": {"name": "Exhibition"}}},
            "created_at": "2025-02-01T10:00:00Z",
            "images": [
                {"id": 9, "image": "/media/p4.jpg", "project": 4},
                {"id": 10, "image": "https://cdn.example/p4b.jpg", "project": 4}
            ]
        }]"#
    }

    #[test]
    fn test_project_localization_falls_back_per_field() {
        let projects: Vec<Project> = serde_json::from_str(project_json()).unwrap();
        let out = localize_projects(&projects, Language::Ar, BASE);
        assert_eq!(out[0].title, "جناح المعرض");
        assert_eq!(out[0].description, "Modular pavilion");
        assert_eq!(out[0].category, "Exhibition");
        assert_eq!(out[0].image, "https://content.example/media/p4.jpg");
        assert_eq!(out[0].images[1].url, "https://cdn.example/p4b.jpg");
    }

    #[test]
    fn test_missing_translations_yield_empty() {
        let projects: Vec<Project> =
            serde_json::from_str(r#"[{"id": 1, "category": null}]"#).unwrap();
        let out = localize_projects(&projects, Language::En, BASE);
        assert_eq!(out[0].title, "");
        assert_eq!(out[0].category, "");
        assert_eq!(out[0].image, "");
    }

    #[test]
    fn test_team_and_clients() {
        let team: Vec<TeamMember> = serde_json::from_str(
            r#"[{"id": 2, "translations": {"en": {"name": "Sara", "title": "Creative Director", "bio": "Designer"}}, "photo": "/media/sara.png"}]"#,
        )
        .unwrap();
        let out = localize_team(&team, Language::Ar, BASE);
        assert_eq!(out[0].name, "Sara");
        assert_eq!(out[0].photo, "https://content.example/media/sara.png");

        let clients: Vec<Client> =
            serde_json::from_str(r#"[{"id": 3, "name": "Expo City", "logo": "logos/expo.svg"}]"#)
                .unwrap();
        let out = localize_clients(&clients, BASE);
        assert_eq!(out[0].id, "3");
        assert_eq!(out[0].logo, "https://content.example/logos/expo.svg");
    }
}
