//! List command - Show available templates and configs.

use anyhow::Result;
use mkproj_templates::{Template, TemplateSummary};

use super::{Cli, UsageError};

pub fn execute(cli: &Cli, target: &str) -> Result<()> {
    let registry = cli.load_registry()?;

    let templates: Vec<&Template> = if target == "all" {
        registry
            .categories()
            .into_iter()
            .flat_map(|(_, templates)| templates.values())
            .collect()
    } else {
        let found = registry.get_all(target);
        if found.is_empty() {
            return Err(UsageError(format!("{} is not a valid template or config", target)).into());
        }
        found
    };

    if cli.json {
        let summaries: Vec<TemplateSummary> = templates.iter().map(|t| t.summary()).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if target != "all" {
        let details: Vec<String> = templates.iter().map(|t| t.detail()).collect();
        print!("{}", details.join("\n"));
        return Ok(());
    }

    if registry.is_empty() {
        println!("No templates found in {}", registry.templates_path().display());
        return Ok(());
    }

    for (i, (heading, templates)) in registry.categories().into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("available {}:", heading);
        for template in templates.values() {
            println!("  {}", template.brief());
        }
    }
    Ok(())
}
