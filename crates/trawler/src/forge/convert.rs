//! Translate forge API payloads into the shared source records.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::source::{SourceProject, SourceRelease, SourceUser};

use super::types::{ForgeModule, ForgeRelease};

/// Parse the forge's timestamp flavours.
///
/// The v3 API answers RFC 3339 on some deployments and
/// `2014-05-13 15:23:32 -0700` on others; unparsable values degrade to
/// `None` rather than failing the record.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    None
}

pub fn to_source_project(base_url: &str, module: &ForgeModule) -> SourceProject {
    SourceProject {
        name: module.name.clone(),
        url: format!(
            "{}/modules/{}/{}",
            base_url, module.owner.username, module.name
        ),
        owner: Some(SourceUser {
            username: module.owner.username.clone(),
            email: None,
        }),
        created_at: module.created_at.as_deref().and_then(parse_timestamp),
        updated_at: module.updated_at.as_deref().and_then(parse_timestamp),
        repositories: Vec::new(),
    }
}

pub fn to_source_release(base_url: &str, release: &ForgeRelease) -> SourceRelease {
    SourceRelease {
        name: release.module.name.clone(),
        version: release.version.clone(),
        url: release
            .slug
            .as_ref()
            .map(|slug| format!("{}/v3/releases/{}", base_url, slug)),
        file_url: release
            .file_uri
            .as_ref()
            .map(|uri| format!("{}{}", base_url, uri)),
        created_at: release.created_at.as_deref().and_then(parse_timestamp),
        updated_at: release.updated_at.as_deref().and_then(parse_timestamp),
        author: Some(SourceUser {
            username: release.module.owner.username.clone(),
            email: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::types::{ForgeOwner, ForgeReleaseModule};

    #[test]
    fn parses_both_timestamp_flavours() {
        assert!(parse_timestamp("2014-05-13T15:23:32Z").is_some());
        assert!(parse_timestamp("2014-05-13 15:23:32 -0700").is_some());
        assert!(parse_timestamp("2014-05-13 15:23:32").is_some());
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn module_translates_to_project_with_owner() {
        let module = ForgeModule {
            name: "stdlib".to_string(),
            owner: ForgeOwner {
                username: "puppetlabs".to_string(),
            },
            created_at: Some("2011-05-24 18:34:58 -0700".to_string()),
            updated_at: None,
        };

        let project = to_source_project("https://forge.example.com", &module);
        assert_eq!(project.name, "stdlib");
        assert_eq!(
            project.url,
            "https://forge.example.com/modules/puppetlabs/stdlib"
        );
        assert_eq!(
            project.owner.as_ref().map(|o| o.username.as_str()),
            Some("puppetlabs")
        );
        assert!(project.created_at.is_some());
        assert!(project.updated_at.is_none());
    }

    #[test]
    fn release_translates_with_urls_and_author() {
        let release = ForgeRelease {
            version: "4.24.0".to_string(),
            module: ForgeReleaseModule {
                name: "stdlib".to_string(),
                owner: ForgeOwner {
                    username: "puppetlabs".to_string(),
                },
            },
            slug: Some("puppetlabs-stdlib-4.24.0".to_string()),
            file_uri: Some("/v3/files/puppetlabs-stdlib-4.24.0.tar.gz".to_string()),
            created_at: None,
            updated_at: None,
        };

        let rel = to_source_release("https://forge.example.com", &release);
        assert_eq!(rel.name, "stdlib");
        assert_eq!(rel.version, "4.24.0");
        assert_eq!(
            rel.url.as_deref(),
            Some("https://forge.example.com/v3/releases/puppetlabs-stdlib-4.24.0")
        );
        assert_eq!(
            rel.file_url.as_deref(),
            Some("https://forge.example.com/v3/files/puppetlabs-stdlib-4.24.0.tar.gz")
        );
        assert_eq!(
            rel.author.as_ref().map(|a| a.username.as_str()),
            Some("puppetlabs")
        );
    }
}
