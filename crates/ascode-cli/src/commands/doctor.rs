use super::{EXIT_FAILURE, EXIT_SUCCESS};
use ascode_core::{AscodeConfig, DistroFactory};

pub fn run(config: &AscodeConfig, json_output: bool) -> Result<u8, String> {
    let mut checks: Vec<Check> = Vec::new();
    let mut all_pass = true;

    check_tool(config, &mut checks, &mut all_pass);

    match DistroFactory::from_config(config) {
        Ok(factory) => check_definitions(&factory, &mut checks, &mut all_pass),
        Err(e) => {
            all_pass = false;
            checks.push(Check::fail("tool_backend", &e.to_string()));
        }
    }

    print_results(&checks, all_pass, json_output)
}

fn check_tool(config: &AscodeConfig, checks: &mut Vec<Check>, all_pass: &mut bool) {
    let tool = match ascode_runtime::select_tool(&config.tool.backend, &config.tool.binary) {
        Ok(tool) => tool,
        Err(e) => {
            *all_pass = false;
            checks.push(Check::fail("tool_prereqs", &e.to_string()));
            return;
        }
    };

    if config.tool.backend == "mock" {
        checks.push(Check::info(
            "tool_prereqs",
            "Mock tool backend selected; osbuild-mpp not required",
        ));
    } else if tool.available() {
        checks.push(Check::pass(
            "tool_prereqs",
            &format!("{} found", tool.name()),
        ));
    } else {
        *all_pass = false;
        let missing = ascode_runtime::check_tool_prereqs(&config.tool.binary);
        checks.push(Check::fail(
            "tool_prereqs",
            &ascode_runtime::format_missing(&missing),
        ));
    }
}

fn check_definitions(factory: &DistroFactory, checks: &mut Vec<Check>, all_pass: &mut bool) {
    let names = match factory.list() {
        Ok(names) => names,
        Err(e) => {
            *all_pass = false;
            checks.push(Check::fail("defs_dir", &e.to_string()));
            return;
        }
    };
    checks.push(Check::pass(
        "defs_dir",
        &format!(
            "Definitions root {} holds {} distributions",
            factory.base_dir().display(),
            names.len()
        ),
    ));

    for name in &names {
        let check_name = format!("distro:{name}");
        match factory.by_name(name) {
            Ok(Some(distro)) => checks.push(Check::pass(
                &check_name,
                &format!(
                    "{name}: {} image types across {} architectures",
                    distro.image_types().len(),
                    distro.list_architectures().len()
                ),
            )),
            Ok(None) => checks.push(Check::warn(
                &check_name,
                &format!("{name}: disappeared while checking"),
            )),
            Err(e) => {
                *all_pass = false;
                checks.push(Check::fail(&check_name, &format!("{name}: {e}")));
            }
        }
    }
}

fn print_results(checks: &[Check], all_pass: bool, json_output: bool) -> Result<u8, String> {
    if json_output {
        let json = serde_json::json!({
            "healthy": all_pass,
            "checks": checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "status": c.status,
                "message": c.message,
            })).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?
        );
    } else {
        println!("ascode doctor\n");
        for check in checks {
            println!("  {} {}", status_icon(check.status), check.message);
        }
        println!();
        if all_pass {
            println!("All checks passed.");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }
    Ok(if all_pass { EXIT_SUCCESS } else { EXIT_FAILURE })
}

fn status_icon(status: &str) -> String {
    use console::Style;
    match status {
        "pass" => Style::new().green().apply_to("✓").to_string(),
        "fail" => Style::new().red().apply_to("✗").to_string(),
        "warn" => Style::new().yellow().apply_to("⚠").to_string(),
        _ => Style::new().dim().apply_to("ℹ").to_string(),
    }
}

struct Check {
    name: String,
    status: &'static str,
    message: String,
}

impl Check {
    fn new(name: &str, status: &'static str, message: &str) -> Self {
        Self {
            name: name.to_owned(),
            status,
            message: message.to_owned(),
        }
    }

    fn pass(name: &str, message: &str) -> Self {
        Self::new(name, "pass", message)
    }

    fn fail(name: &str, message: &str) -> Self {
        Self::new(name, "fail", message)
    }

    fn warn(name: &str, message: &str) -> Self {
        Self::new(name, "warn", message)
    }

    fn info(name: &str, message: &str) -> Self {
        Self::new(name, "info", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascode_core::ToolConfig;

    fn mock_config(defs: &std::path::Path) -> AscodeConfig {
        AscodeConfig {
            defs_dir: defs.to_path_buf(),
            tool: ToolConfig {
                backend: "mock".to_owned(),
                ..ToolConfig::default()
            },
        }
    }

    #[test]
    fn broken_distro_fails_check() {
        let defs = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(defs.path().join("empty-1")).unwrap();
        let factory = DistroFactory::from_config(&mock_config(defs.path())).unwrap();

        let mut checks = Vec::new();
        let mut all_pass = true;
        check_definitions(&factory, &mut checks, &mut all_pass);
        assert!(!all_pass);
        assert_eq!(checks[1].name, "distro:empty-1");
        assert_eq!(checks[1].status, "fail");
    }

    #[test]
    fn mock_backend_skips_binary_check() {
        let defs = tempfile::tempdir().unwrap();
        let mut checks = Vec::new();
        let mut all_pass = true;
        check_tool(&mock_config(defs.path()), &mut checks, &mut all_pass);
        assert!(all_pass);
        assert_eq!(checks[0].status, "info");
    }

    #[test]
    fn missing_binary_fails_check() {
        let defs = tempfile::tempdir().unwrap();
        let mut config = mock_config(defs.path());
        config.tool.backend = "osbuild-mpp".to_owned();
        config.tool.binary = "/nonexistent/osbuild-mpp".to_owned();

        let mut checks = Vec::new();
        let mut all_pass = true;
        check_tool(&config, &mut checks, &mut all_pass);
        assert!(!all_pass);
        assert!(checks[0].message.contains("/nonexistent/osbuild-mpp"));
    }

    #[test]
    fn present_binary_passes_check() {
        let defs = tempfile::tempdir().unwrap();
        let bin = defs.path().join("osbuild-mpp");
        std::fs::write(&bin, "").unwrap();
        let mut config = mock_config(defs.path());
        config.tool.backend = "osbuild-mpp".to_owned();
        config.tool.binary = bin.to_string_lossy().into_owned();

        let mut checks = Vec::new();
        let mut all_pass = true;
        check_tool(&config, &mut checks, &mut all_pass);
        assert!(all_pass);
        assert_eq!(checks[0].status, "pass");
    }

    #[test]
    fn unknown_backend_fails_check() {
        let defs = tempfile::tempdir().unwrap();
        let mut config = mock_config(defs.path());
        config.tool.backend = "jinja".to_owned();

        let mut checks = Vec::new();
        let mut all_pass = true;
        check_tool(&config, &mut checks, &mut all_pass);
        assert!(!all_pass);
        assert!(checks[0].message.contains("jinja"));
    }
}
