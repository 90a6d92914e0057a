//! Static content served when the remote source cannot be used.

use crate::domain::model::{
    Asset, Capability, CopyContentType, SiteContent, SiteCopy, SiteCopySection, Venture,
    VentureMetrics,
};

const FALLBACK_UPDATED: &str = "2026-01-01T00:00:00Z";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn ventures() -> Vec<Venture> {
    vec![
        Venture {
            id: "fallback-venture-1".to_string(),
            name: "Lumen Health".to_string(),
            logo: "https://ovsia.com/images/ventures/lumen-health.svg".to_string(),
            logo_alt: "Lumen Health logo".to_string(),
            stat: "3.2x".to_string(),
            outcome: "Patient engagement".to_string(),
            description: "Care coordination platform connecting clinics with patients between visits."
                .to_string(),
            metrics: VentureMetrics {
                revenue: "$8M ARR".to_string(),
                users: "120k patients".to_string(),
                growth: "+210% YoY".to_string(),
            },
            site_url: "https://lumenhealth.example.com".to_string(),
            sort_order: 1,
        },
        Venture {
            id: "fallback-venture-2".to_string(),
            name: "Fieldline".to_string(),
            logo: "https://ovsia.com/images/ventures/fieldline.svg".to_string(),
            logo_alt: "Fieldline logo".to_string(),
            stat: "40%".to_string(),
            outcome: "Lower logistics cost".to_string(),
            description: "Routing and dispatch software for regional freight operators."
                .to_string(),
            metrics: VentureMetrics {
                revenue: "$14M ARR".to_string(),
                users: "900 fleets".to_string(),
                growth: "+95% YoY".to_string(),
            },
            site_url: "https://fieldline.example.com".to_string(),
            sort_order: 2,
        },
        Venture {
            id: "fallback-venture-3".to_string(),
            name: "Parcel Atlas".to_string(),
            logo: "https://ovsia.com/images/ventures/parcel-atlas.svg".to_string(),
            logo_alt: "Parcel Atlas logo".to_string(),
            stat: "10M+".to_string(),
            outcome: "Properties mapped".to_string(),
            description: "Land and property data API for real-estate developers.".to_string(),
            metrics: VentureMetrics {
                revenue: "$5M ARR".to_string(),
                users: "2.5k developers".to_string(),
                growth: "+160% YoY".to_string(),
            },
            site_url: "https://parcelatlas.example.com".to_string(),
            sort_order: 3,
        },
    ]
}

pub fn capabilities() -> Vec<Capability> {
    vec![
        Capability {
            id: "fallback-capability-1".to_string(),
            title: "Venture Strategy".to_string(),
            subtitle: "From thesis to launch".to_string(),
            description: "We validate markets, shape the business model and assemble founding teams."
                .to_string(),
            features: strings(&["Market validation", "Business modelling", "Founder matching"]),
            examples: strings(&["Lumen Health go-to-market", "Fieldline pricing model"]),
            technologies: strings(&["Customer research", "Financial modelling"]),
            sort_order: 1,
        },
        Capability {
            id: "fallback-capability-2".to_string(),
            title: "Product Engineering".to_string(),
            subtitle: "Built to scale".to_string(),
            description: "Senior engineering teams that ship the first version and the next ten."
                .to_string(),
            features: strings(&["Platform architecture", "Mobile and web apps", "Data pipelines"]),
            examples: strings(&["Parcel Atlas API", "Fieldline dispatch console"]),
            technologies: strings(&["Rust", "TypeScript", "PostgreSQL", "Kubernetes"]),
            sort_order: 2,
        },
        Capability {
            id: "fallback-capability-3".to_string(),
            title: "Brand & Design".to_string(),
            subtitle: "Identity that earns trust".to_string(),
            description: "Naming, identity systems and product design for new ventures."
                .to_string(),
            features: strings(&["Brand identity", "Design systems", "Product UX"]),
            examples: strings(&["Lumen Health rebrand"]),
            technologies: strings(&["Figma", "Motion design"]),
            sort_order: 3,
        },
        Capability {
            id: "fallback-capability-4".to_string(),
            title: "Growth".to_string(),
            subtitle: "Compounding traction".to_string(),
            description: "Acquisition, retention and analytics programs run alongside founders."
                .to_string(),
            features: strings(&["Performance marketing", "Lifecycle campaigns", "Analytics"]),
            examples: strings(&["Parcel Atlas developer funnel"]),
            technologies: strings(&["Experimentation", "Attribution modelling"]),
            sort_order: 4,
        },
    ]
}

fn section(name: &str, primary: &str, secondary: &str, button: &str) -> SiteCopySection {
    SiteCopySection {
        section_name: name.to_string(),
        content_type: CopyContentType::Fallback,
        primary_text: primary.to_string(),
        secondary_text: secondary.to_string(),
        button_text: button.to_string(),
        last_updated: FALLBACK_UPDATED.to_string(),
    }
}

pub fn site_copy() -> SiteCopy {
    SiteCopy {
        hero: section(
            "hero",
            "We build companies that matter.",
            "Ovsia is a venture studio partnering with founders from first idea to scale.",
            "See our ventures",
        ),
        essence: section(
            "essence",
            "Operators, not observers.",
            "Our teams work inside every venture we start.",
            "",
        ),
        capabilities: section(
            "capabilities",
            "Everything a new venture needs.",
            "Strategy, engineering, design and growth under one roof.",
            "Explore capabilities",
        ),
        proof: section(
            "proof",
            "Results that compound.",
            "Ventures built with Ovsia grow faster and raise on stronger terms.",
            "",
        ),
        cta: section(
            "cta",
            "Have an idea worth building?",
            "Tell us about it and we will get back to you within a week.",
            "Start a conversation",
        ),
        footer: section(
            "footer",
            "Ovsia Venture Studio",
            "Building the next generation of companies.",
            "Contact",
        ),
    }
}

pub fn assets() -> Vec<Asset> {
    vec![
        Asset {
            name: "hero-background".to_string(),
            asset_type: "image".to_string(),
            url: "https://ovsia.com/images/hero-background.jpg".to_string(),
            alt_text: "Abstract gradient background".to_string(),
            usage_context: strings(&["hero"]),
        },
        Asset {
            name: "ovsia-logo".to_string(),
            asset_type: "logo".to_string(),
            url: "https://ovsia.com/images/ovsia-logo.svg".to_string(),
            alt_text: "Ovsia logo".to_string(),
            usage_context: strings(&["header", "footer"]),
        },
    ]
}

pub fn site_content() -> SiteContent {
    SiteContent {
        ventures: ventures(),
        capabilities: capabilities(),
        site_copy: site_copy(),
        assets: assets(),
    }
}
