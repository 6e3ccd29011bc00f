//! Family group commands: `recipebook family ...`.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use recipebook::api::MemberInvite;
use recipebook::ui::icons::{FAMILY, PERSON};
use recipebook::ui::{Notice, with_spinner};

use super::super::{Cli, FamilyCommands};
use super::{load_config, require_session};

pub async fn cmd_family(project_dir: &Path, cli: &Cli, command: FamilyCommands) -> Result<()> {
    let config = load_config(project_dir, cli)?;
    let session = require_session(&config).await?;
    let client = session.client();

    match command {
        FamilyCommands::List => {
            let families = with_spinner("Loading families...", client.list_families())
                .await
                .context("Failed to load families")?;
            if families.is_empty() {
                println!("You are not in any family yet.");
                println!("Run 'recipebook family create <name>' to start one.");
                return Ok(());
            }
            println!();
            for family in &families {
                let role = if family.is_admin() { " (admin)" } else { "" };
                println!(
                    "{}{}{}  {}",
                    FAMILY,
                    style(&family.name).bold(),
                    style(role).yellow(),
                    style(&family.id).dim()
                );
            }
            println!();
        }
        FamilyCommands::Create { name } => {
            let family = with_spinner("Creating family...", client.create_family(&name))
                .await
                .context("Failed to create family")?;
            Notice::success(format!("Created family {} ({})", family.name, family.id)).print();
        }
        FamilyCommands::Members { id } => {
            let members = with_spinner("Loading members...", client.family_members(&id))
                .await
                .with_context(|| format!("Failed to load members of family {}", id))?;
            println!();
            for member in &members {
                let mut details = Vec::new();
                if let Some(relation) = &member.relation {
                    details.push(relation.clone());
                }
                if let Some(role) = &member.role {
                    details.push(role.clone());
                }
                if let Some(status) = member
                    .invitation_status
                    .as_deref()
                    .filter(|s| *s != "accepted")
                {
                    details.push(status.to_string());
                }
                println!(
                    "{}{}  {}  {}",
                    PERSON,
                    style(member.display_name()).bold(),
                    style(details.join(", ")).dim(),
                    style(&member.id).dim()
                );
            }
            println!();
        }
        FamilyCommands::AddMember {
            id,
            email,
            name,
            phone,
            relation,
        } => {
            let invite = MemberInvite {
                email,
                name,
                phone,
                relation,
            };
            let member = with_spinner("Adding member...", client.add_family_member(&id, &invite))
                .await
                .context("Failed to add family member")?;
            Notice::success(format!("Added {} to the family", member.display_name())).print();
        }
        FamilyCommands::RemoveMember { family, member } => {
            with_spinner(
                "Removing member...",
                client.remove_family_member(&family, &member),
            )
            .await
            .context("Failed to remove family member")?;
            Notice::success("Member removed").print();
        }
    }

    Ok(())
}
