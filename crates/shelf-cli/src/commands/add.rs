use std::path::Path;

use shelf_core::models::{
    is_reserved_command, validate_content_size, validate_script_name, CachedScript, ScriptType,
};
use shelf_core::util::now_millis;

use crate::commands::common::{resolve_content, Context};
use crate::error::CliError;

pub async fn run(
    name: &str,
    description: Option<String>,
    script_type: ScriptType,
    file: Option<&Path>,
    no_install: bool,
) -> Result<(), CliError> {
    validate_script_name(name)?;
    if is_reserved_command(name) {
        eprintln!("Warning: '{name}' shadows a common system command.");
    }

    let ctx = Context::load()?;
    let Some(content) = resolve_content(file, &initial_template(name, script_type))? else {
        return Err(CliError::EmptyContent);
    };
    validate_content_size(&content)?;

    // Cache first so the script survives even when the push fails.
    ctx.cache.put(&CachedScript {
        name: name.to_string(),
        content,
        description,
        script_type,
        updated_at: 0,
        local_modified_at: Some(now_millis()),
    })?;

    let client = ctx.client()?;
    ctx.reconciler(&client).push_script(name).await?;
    println!("Created {name}");

    if !no_install && script_type == ScriptType::Executable {
        ctx.installer.install(&ctx.cache, name)?;
        println!("Installed {name}");
        print_path_hint(&ctx);
    }

    Ok(())
}

fn initial_template(name: &str, script_type: ScriptType) -> String {
    match script_type {
        ScriptType::Executable => format!("#!/usr/bin/env bash\n# {name}\n\n"),
        ScriptType::Source => format!("# {name}: sourced into the shell\n\n"),
        ScriptType::Function => format!("{name}() {{\n    \n}}\n"),
    }
}

pub fn print_path_hint(ctx: &Context) {
    let setup = ctx.installer.check_path_setup();
    if setup.configured {
        return;
    }
    let shell_file = shelf_core::install::recommended_shell_file();
    println!(
        "Note: {} is not on your PATH. Add it with:\n  echo '{}' >> {}",
        ctx.paths.bin_dir.display(),
        ctx.installer.path_export_line().trim(),
        shell_file.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executable_template_starts_with_shebang() {
        let template = initial_template("deploy", ScriptType::Executable);
        assert!(template.starts_with("#!/usr/bin/env bash"));
        assert!(template.contains("# deploy"));
    }

    #[test]
    fn function_template_declares_the_function() {
        let template = initial_template("greet", ScriptType::Function);
        assert!(template.starts_with("greet() {"));
    }
}
