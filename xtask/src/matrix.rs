use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;

use crate::sh::{ShOptions, StreamMode};

#[derive(Args, Debug, Default)]
pub struct MatrixArgs {
    /// Path to YAML config (defaults to `<workspace>/matrix.yaml`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// A name from `commands:` or an inline command template.
    ///
    /// Per-entry `command:` overrides this.
    #[arg(long)]
    pub command: Option<String>,

    /// Only run matrix entries for these packages (repeatable).
    ///
    /// Example: `xtask matrix -p bootcode --command check`
    #[arg(short = 'p', long = "package")]
    pub packages: Vec<String>,

    /// Only run matrix entries for these target triples (repeatable).
    #[arg(short = 't', long = "target")]
    pub targets: Vec<String>,

    /// Print the plan without running anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(serde::Deserialize, Debug)]
struct MatrixConfig {
    #[serde(default)]
    commands: BTreeMap<String, String>,
    /// `RUSTFLAGS` applied whenever a given target triple is built.
    #[serde(default)]
    rustflags: BTreeMap<String, String>,
    entries: Vec<MatrixEntry>,
}

/// `target: thumbv7m-none-eabi` or a list, nested lists allowed so YAML aliases expand cleanly.
#[derive(serde::Deserialize, Debug)]
#[serde(untagged)]
enum Targets {
    One(String),
    Many(Vec<Targets>),
}

impl Targets {
    fn flatten<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Targets::One(s) => out.push(s.as_str()),
            Targets::Many(v) => v.iter().for_each(|t| t.flatten(out)),
        }
    }
}

/// A feature always enabled, or a group of which exactly one is picked per build.
/// An empty string in a group means "none of them".
#[derive(serde::Deserialize, Debug)]
#[serde(untagged)]
enum FeatureSpec {
    One(String),
    OneOf(Vec<String>),
}

#[derive(serde::Deserialize, Debug)]
struct MatrixEntry {
    command: Option<String>,
    package: String,
    target: Targets,
    #[serde(default)]
    features: Vec<FeatureSpec>,
}

#[derive(Debug, PartialEq, Eq)]
struct Step {
    name: String,
    cmd: String,
    rustflags: Option<String>,
}

fn feature_combinations(specs: &[FeatureSpec]) -> Vec<String> {
    let mut combos: Vec<Vec<&str>> = vec![Vec::new()];
    for spec in specs {
        match spec {
            FeatureSpec::One(f) => combos.iter_mut().for_each(|c| c.push(f)),
            FeatureSpec::OneOf(group) => {
                combos = group
                    .iter()
                    .flat_map(|opt| {
                        combos.iter().map(move |c| {
                            let mut next = c.clone();
                            next.push(opt);
                            next
                        })
                    })
                    .collect();
            }
        }
    }

    combos
        .into_iter()
        .map(|mut feats| {
            feats.retain(|f| !f.is_empty());
            feats.sort_unstable();
            feats.dedup();
            feats.join(",")
        })
        .collect()
}

fn render_template(
    template: &str,
    workspace: &Path,
    package: &str,
    target: &str,
    features: &str,
) -> String {
    let features_flag = if features.is_empty() {
        String::new()
    } else {
        format!(r#"--features "{features}""#)
    };
    template
        .replace("{workspace}", &workspace.to_string_lossy())
        .replace("{package}", package)
        .replace("{target}", target)
        .replace("{features}", features)
        .replace("{features_flag}", &features_flag)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn host_target() -> Result<String> {
    let opts = ShOptions {
        stdout: StreamMode::Pipe,
        stderr: StreamMode::Pipe,
        ..Default::default()
    };
    let out = crate::sh!(options(opts), "rustc -vV")?;
    out.stdout
        .lines()
        .find_map(|line| line.strip_prefix("host:"))
        .map(|host| host.trim().to_string())
        .ok_or_else(|| anyhow!("rustc -vV output missing host line"))
}

fn plan(cfg: &MatrixConfig, args: &MatrixArgs, workspace: &Path, host: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();

    for entry in &cfg.entries {
        if !args.packages.is_empty() && !args.packages.contains(&entry.package) {
            continue;
        }

        let Some(cmd_name) = entry.command.as_ref().or(args.command.as_ref()) else {
            bail!("no command selected for {} (pass --command or set `command:`)", entry.package);
        };
        let template = cfg.commands.get(cmd_name).unwrap_or(cmd_name);

        let mut targets = Vec::new();
        entry.target.flatten(&mut targets);
        let combos = feature_combinations(&entry.features);

        for target in targets {
            let target = if target == "host" { host } else { target };
            if !args.targets.is_empty() && !args.targets.iter().any(|t| t == target) {
                continue;
            }
            for (idx, features) in combos.iter().enumerate() {
                let suffix = if combos.len() > 1 {
                    format!(" #{}/{}", idx + 1, combos.len())
                } else {
                    String::new()
                };
                steps.push(Step {
                    name: format!("{} [{target}] ({cmd_name}){suffix}", entry.package),
                    cmd: render_template(template, workspace, &entry.package, target, features),
                    rustflags: cfg.rustflags.get(target).cloned(),
                });
            }
        }
    }

    Ok(steps)
}

pub fn run(args: MatrixArgs) -> Result<()> {
    let workspace = crate::findup::workspace_root()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| workspace.join("matrix.yaml"));
    let bytes = std::fs::read(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let cfg: MatrixConfig = serde_yaml::from_slice(&bytes)
        .with_context(|| format!("parsing {}", config_path.display()))?;

    let steps = plan(&cfg, &args, &workspace, &host_target()?)?;
    if steps.is_empty() {
        log::warn!("[matrix] nothing selected");
    }

    for (i, step) in steps.iter().enumerate() {
        log::info!("[{}/{}] {}", i + 1, steps.len(), step.name);
        log::debug!("{}", step.cmd);
        if args.dry_run {
            continue;
        }

        let mut opts = ShOptions {
            cwd: Some(workspace.clone()),
            ..Default::default()
        };
        if let Some(flags) = &step.rustflags {
            opts.env.push(("RUSTFLAGS".into(), flags.clone()));
        }
        crate::sh!(options(opts), &step.cmd).with_context(|| step.name.clone())?;
    }

    log::info!("[matrix] done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
commands:
  check: cargo check -p {package} --target {target} --no-default-features {features_flag}
rustflags:
  aarch64-unknown-none: -C target-feature=+mte
targets:
  m-profile: &m [thumbv6m-none-eabi, thumbv7em-none-eabihf]
entries:
  - package: bootcode
    command: check
    target: [aarch64-unknown-none, *m]
    features: [["", debug]]
  - package: semihost-platform
    target: host
    features: [semihost-exit, init-array]
"#;

    fn config() -> MatrixConfig {
        serde_yaml::from_str(CONFIG).unwrap()
    }

    #[test]
    fn test_feature_groups_multiply() {
        let specs = vec![
            FeatureSpec::One("base".into()),
            FeatureSpec::OneOf(vec!["a".into(), "b".into()]),
            FeatureSpec::OneOf(vec!["".into(), "x".into()]),
        ];
        assert_eq!(
            feature_combinations(&specs),
            vec!["a,base", "b,base", "a,base,x", "b,base,x"]
        );
    }

    #[test]
    fn test_no_features_is_one_empty_combo() {
        assert_eq!(feature_combinations(&[]), vec![String::new()]);
    }

    #[test]
    fn test_render_drops_empty_feature_flag() {
        let cmd = render_template(
            "cargo build -p {package} --target {target} {features_flag} --release",
            Path::new("/ws"),
            "bootcode",
            "thumbv7m-none-eabi",
            "",
        );
        assert_eq!(cmd, "cargo build -p bootcode --target thumbv7m-none-eabi --release");
    }

    #[test]
    fn test_plan_expands_aliases_and_features() {
        let args = MatrixArgs {
            packages: vec!["bootcode".into()],
            ..Default::default()
        };
        let steps = plan(&config(), &args, Path::new("/ws"), "x86_64-unknown-linux-gnu").unwrap();

        // 3 targets, 2 feature combos each
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0].name, "bootcode [aarch64-unknown-none] (check) #1/2");
        assert_eq!(
            steps[1].cmd,
            r#"cargo check -p bootcode --target aarch64-unknown-none --no-default-features --features "debug""#
        );
        assert_eq!(steps[0].rustflags.as_deref(), Some("-C target-feature=+mte"));
        assert_eq!(steps[5].rustflags, None);
        assert!(steps[5].cmd.contains("thumbv7em-none-eabihf"));
    }

    #[test]
    fn test_plan_filters_targets() {
        let args = MatrixArgs {
            targets: vec!["thumbv6m-none-eabi".into()],
            ..Default::default()
        };
        let steps = plan(&config(), &args, Path::new("/ws"), "host-triple");
        // the second entry has no command of its own
        assert!(steps.is_err());

        let args = MatrixArgs {
            targets: vec!["thumbv6m-none-eabi".into()],
            packages: vec!["bootcode".into()],
            ..Default::default()
        };
        let steps = plan(&config(), &args, Path::new("/ws"), "host-triple").unwrap();
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_host_target_substituted() {
        let args = MatrixArgs {
            command: Some("cargo test -p {package} --target {target} --features {features}".into()),
            packages: vec!["semihost-platform".into()],
            ..Default::default()
        };
        let steps = plan(&config(), &args, Path::new("/ws"), "x86_64-unknown-linux-gnu").unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].cmd,
            "cargo test -p semihost-platform --target x86_64-unknown-linux-gnu --features init-array,semihost-exit"
        );
    }
}
