use crate::domain::model::{
    Asset, Capability, SiteContent, SiteCopySection, ValidationResult, Venture,
};
use crate::utils::validation::validate_url;
use serde::Serialize;

#[derive(Default)]
struct Checker {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Checker {
    fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.errors.push(format!("Missing required field: {}", field));
        }
    }

    fn recommend(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.warnings.push(format!("Missing recommended field: {}", field));
        }
    }

    /// 空值不檢查，格式錯誤只列為警告
    fn url(&mut self, field: &str, value: &str) {
        if !value.trim().is_empty() && validate_url(field, value).is_err() {
            self.warnings.push(format!("Invalid URL in {}: {}", field, value));
        }
    }

    fn finish(self) -> ValidationResult {
        ValidationResult {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

pub fn validate_venture(venture: &Venture) -> ValidationResult {
    let mut check = Checker::default();
    check.require("name", &venture.name);
    check.require("description", &venture.description);
    check.recommend("logo", &venture.logo);
    check.recommend("logoAlt", &venture.logo_alt);
    check.recommend("siteUrl", &venture.site_url);
    check.url("logo", &venture.logo);
    check.url("siteUrl", &venture.site_url);
    check.finish()
}

pub fn validate_capability(capability: &Capability) -> ValidationResult {
    let mut check = Checker::default();
    check.require("title", &capability.title);
    check.require("description", &capability.description);
    check.recommend("subtitle", &capability.subtitle);
    if capability.features.is_empty() {
        check.warnings.push("No features listed".to_string());
    }
    check.finish()
}

pub fn validate_site_copy_section(section: &SiteCopySection) -> ValidationResult {
    let mut check = Checker::default();
    check.require("primaryText", &section.primary_text);
    check.finish()
}

pub fn validate_asset(asset: &Asset) -> ValidationResult {
    let mut check = Checker::default();
    check.require("name", &asset.name);
    check.require("url", &asset.url);
    check.recommend("altText", &asset.alt_text);
    check.url("url", &asset.url);
    check.finish()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionValidation {
    pub total: usize,
    pub valid: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CollectionValidation {
    fn collect<'a, T: 'a>(
        items: impl IntoIterator<Item = &'a T>,
        label: impl Fn(&T) -> String,
        validate: impl Fn(&T) -> ValidationResult,
    ) -> Self {
        let mut summary = Self::default();
        for item in items {
            let result = validate(item);
            summary.total += 1;
            if result.is_valid {
                summary.valid += 1;
            }
            let name = label(item);
            summary
                .errors
                .extend(result.errors.into_iter().map(|e| format!("{}: {}", name, e)));
            summary
                .warnings
                .extend(result.warnings.into_iter().map(|w| format!("{}: {}", name, w)));
        }
        summary
    }

    pub fn is_complete(&self) -> bool {
        self.valid == self.total
    }
}

/// Validation totals for a whole snapshot. Purely informational: nothing in
/// the snapshot is removed because of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentValidationReport {
    pub ventures: CollectionValidation,
    pub capabilities: CollectionValidation,
    pub site_copy: CollectionValidation,
    pub assets: CollectionValidation,
}

impl ContentValidationReport {
    pub fn collections(&self) -> [(&'static str, &CollectionValidation); 4] {
        [
            ("Ventures", &self.ventures),
            ("Capabilities", &self.capabilities),
            ("Site copy", &self.site_copy),
            ("Assets", &self.assets),
        ]
    }

    pub fn issues(&self) -> impl Iterator<Item = &String> {
        self.collections()
            .into_iter()
            .flat_map(|(_, c)| c.errors.iter().chain(c.warnings.iter()))
    }
}

fn display_name(primary: &str, fallback: &str) -> String {
    if primary.trim().is_empty() {
        fallback.to_string()
    } else {
        primary.to_string()
    }
}

pub fn validate_site_content(content: &SiteContent) -> ContentValidationReport {
    ContentValidationReport {
        ventures: CollectionValidation::collect(
            &content.ventures,
            |v: &Venture| format!("venture '{}'", display_name(&v.name, &v.id)),
            validate_venture,
        ),
        capabilities: CollectionValidation::collect(
            &content.capabilities,
            |c: &Capability| format!("capability '{}'", display_name(&c.title, &c.id)),
            validate_capability,
        ),
        site_copy: CollectionValidation::collect(
            content.site_copy.sections(),
            |s: &SiteCopySection| format!("section '{}'", s.section_name),
            validate_site_copy_section,
        ),
        assets: CollectionValidation::collect(
            &content.assets,
            |a: &Asset| format!("asset '{}'", display_name(&a.name, &a.url)),
            validate_asset,
        ),
    }
}
