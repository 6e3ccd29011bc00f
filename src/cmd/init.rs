//! Workspace initialization: `recipebook init`.

use anyhow::Result;

pub fn cmd_init(project_dir: &std::path::Path) -> Result<()> {
    use recipebook::init::{init_project, is_initialized};

    let was_initialized = is_initialized(project_dir);

    let result = init_project(project_dir)?;

    if result.created {
        println!(
            "Initialized recipebook at {}",
            result.recipebook_dir.display()
        );
        println!();
        println!("Created directory structure:");
        println!("  .recipebook/");
        println!("  ├── recipebook.toml   # Backend, upload and autocomplete settings");
        println!("  ├── storage.json      # Local drafts");
        println!("  └── public/uploads/   # Images stored by `recipebook serve`");
        println!();
        println!("Next steps:");
        println!("  1. Run `recipebook login` to sign in to the backend");
        println!("  2. Run `recipebook serve` in another terminal for image uploads");
        println!("  3. Run `recipebook recipe new` to write your first recipe");
    } else if was_initialized {
        println!(
            "Recipebook already initialized at {}",
            result.recipebook_dir.display()
        );
        println!("Directory structure verified.");
    } else {
        println!(
            "Completed recipebook initialization at {}",
            result.recipebook_dir.display()
        );
    }

    Ok(())
}
