//! CLI command handling
//!
//! Dispatches CLI commands to the suite runner, the scenario runner or the
//! REST client, and formats output.

use colored::Colorize;

use crate::api::ApiClient;
use crate::commands::{ApiCommands, Commands, GlobalArgs, WhitelistCommands};
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::testing::{builtin, RunSettings, Scenario, ScenarioRunner, SuiteFile, SuiteRunner};

/// Dispatch a CLI command.
///
/// Returns whether everything that ran passed.
pub async fn dispatch(command: Commands, global: GlobalArgs) -> Result<bool> {
    let config = load_config(&global)?;

    match command {
        Commands::Run { suite } => {
            let (name, scenarios, settings) = match suite {
                Some(path) => {
                    let file = SuiteFile::load(&path)?;
                    let mut settings = RunSettings::from_config(&config);
                    if let Some(endpoint) = file.endpoint.clone() {
                        settings.endpoint = endpoint;
                    }
                    if let Some(root) = file.artifact_root.clone() {
                        settings.artifact_root = root;
                    }
                    let name = file.name.clone();
                    (name, file.into_scenarios(), settings)
                }
                None => (
                    builtin::AUDIO_SUITE.to_string(),
                    builtin::audio_suite(),
                    RunSettings::from_config(&config),
                ),
            };

            let settings = apply_overrides(settings, &global);
            let suite = SuiteRunner::new(
                ScenarioRunner::new(settings),
                config.timeouts.inter_scenario(),
            );
            let report = suite.run(&name, &scenarios).await;
            Ok(report.summary.all_passed())
        }

        Commands::Quick { name } => {
            let scenario = builtin::quick(&name).ok_or_else(|| {
                Error::Config(format!(
                    "Unknown quick scenario '{}'. Available: {}",
                    name,
                    builtin::QUICK_NAMES.join(", ")
                ))
            })?;
            run_single(&config, &global, scenario).await
        }

        Commands::Send {
            message,
            expect,
            envelope,
            session,
            timeout,
            max_frames,
        } => {
            let mut scenario = if envelope {
                Scenario::envelope("Ad hoc message", message)
            } else {
                Scenario::text("Ad hoc message", message)
            };
            if let Some(path) = expect {
                scenario = scenario.expecting(path);
            }
            if let Some(session) = session {
                scenario = scenario.with_session(session);
            }
            if let Some(secs) = timeout {
                scenario = scenario.with_timeout(std::time::Duration::from_secs(secs));
            }
            if let Some(max) = max_frames {
                scenario = scenario.with_max_frames(max);
            }
            run_single(&config, &global, scenario).await
        }

        Commands::List => {
            println!("{}", builtin::AUDIO_SUITE.blue().bold());
            for scenario in builtin::audio_suite() {
                print_scenario_line(&scenario);
            }
            println!("\n{}", "Quick scenarios".blue().bold());
            for name in builtin::QUICK_NAMES {
                if let Some(scenario) = builtin::quick(name) {
                    print!("  {:<12}", name.cyan());
                    print_scenario_line(&scenario);
                }
            }
            Ok(true)
        }

        Commands::Api(api_cmd) => {
            let base_url = global
                .base_url
                .clone()
                .unwrap_or_else(|| config.backend.base_url.clone());
            let client = ApiClient::new(&base_url).with_token(global.token.clone());
            dispatch_api(client, api_cmd).await?;
            Ok(true)
        }
    }
}

fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn apply_overrides(mut settings: RunSettings, global: &GlobalArgs) -> RunSettings {
    if let Some(url) = &global.url {
        settings.endpoint = url.clone();
    }
    if let Some(root) = &global.artifact_root {
        settings.artifact_root = root.clone();
    }
    settings.verbose = global.verbose;
    settings
}

async fn run_single(config: &Config, global: &GlobalArgs, scenario: Scenario) -> Result<bool> {
    let settings = apply_overrides(RunSettings::from_config(config), global);
    let result = ScenarioRunner::new(settings).run(&scenario).await;
    Ok(result.passed())
}

fn print_scenario_line(scenario: &Scenario) {
    let artifact = scenario
        .expected_artifact
        .as_ref()
        .map(|p| format!(" → {}", p.display()))
        .unwrap_or_default();
    println!("  {}{}", scenario.name, artifact.dimmed());
}

async fn dispatch_api(mut client: ApiClient, command: ApiCommands) -> Result<()> {
    match command {
        ApiCommands::Status => {
            let status = client.status().await?;
            println!("API Status:");
            for key in ["status", "version", "timestamp"] {
                let value = status
                    .get(key)
                    .map(display_value)
                    .unwrap_or_else(|| "Unknown".into());
                println!("  {}: {}", key, value);
            }
        }

        ApiCommands::Register {
            email,
            username,
            password,
        } => {
            let session = client.register(&email, &username, &password).await?;
            println!("{} Registered as {}", "✓".green(), session.user.username);
            println!("Token: {}", session.token);
        }

        ApiCommands::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            println!("{} Logged in as {}", "✓".green(), session.user.username);
            println!("  Role: {}", session.user.role());
            println!("Token: {}", session.token);
            println!("{}", "Export it as HARNESS_TOKEN for authenticated calls".dimmed());
        }

        ApiCommands::Verify => {
            client.verify().await?;
            println!("{} Token is valid", "✓".green());
        }

        ApiCommands::Upload { file, session } => {
            let uploaded = client.upload(&file, session.as_deref()).await?;
            println!("{} Uploaded {}", "✓".green(), file.display());
            for info in uploaded {
                if let Some(id) = info.id {
                    println!("  File ID: {}", display_value(&id));
                }
                if let Some(size) = info.size {
                    println!("  Size: {} bytes", size);
                }
            }
        }

        ApiCommands::Stats => {
            let stats = client.admin_stats().await?;
            println!("Admin Statistics:");
            println!("  Total Users: {}", stats.total_users);
            println!("  Active Users: {}", stats.active_users);
            println!("  Chat Sessions: {}", stats.total_chat_sessions);
            println!("  Uploaded Files: {}", stats.total_files);
        }

        ApiCommands::Users {
            page,
            limit,
            search,
        } => {
            let (users, pagination) = client.users(page, limit, search.as_deref()).await?;
            println!(
                "Users (page {} of {}, {} total):",
                pagination.page, pagination.total_pages, pagination.total
            );
            for user in users {
                let status = match user.is_active {
                    Some(false) => "Inactive",
                    _ => "Active",
                };
                println!(
                    "  {} ({}) - {} - {}",
                    user.username,
                    user.email,
                    user.role(),
                    status
                );
            }
        }

        ApiCommands::Whitelist(wl_cmd) => match wl_cmd {
            WhitelistCommands::Status => {
                let status = client.whitelist_status().await?;
                println!("Whitelist:");
                println!("  Enabled: {}", if status.enabled { "yes" } else { "no" });
                println!("  Whitelisted emails: {}", status.total_emails);
            }
            WhitelistCommands::Enable => {
                client.whitelist_toggle(true).await?;
                println!("{} Whitelist enabled", "✓".green());
            }
            WhitelistCommands::Disable => {
                client.whitelist_toggle(false).await?;
                println!("{} Whitelist disabled", "✓".green());
            }
            WhitelistCommands::List => {
                let emails = client.whitelist_emails().await?;
                println!("Whitelisted emails ({} total):", emails.len());
                for entry in emails {
                    let added = entry
                        .created_at
                        .as_deref()
                        .and_then(|ts| ts.get(..10))
                        .unwrap_or("unknown");
                    println!("  [{}] {} (added {})", entry.id, entry.email, added);
                }
            }
            WhitelistCommands::Add { email } => {
                client.whitelist_add(&email).await?;
                println!("{} Added {} to whitelist", "✓".green(), email);
            }
            WhitelistCommands::Remove { id } => {
                client.whitelist_remove(id).await?;
                println!("{} Removed email {} from whitelist", "✓".green(), id);
            }
        },
    }

    Ok(())
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
