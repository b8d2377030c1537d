use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Secrets and tokens are deliberately left off this list
    const DISPLAY_ENVS: [&str; 16] = [
        "RUST_LOG",
        "RELAY_HOST",
        "RELAY_PORT",
        "RELAY_DATABASE_URL",
        "RELAY_DEDUP_WINDOW_SECS",
        "RELAY_HTTP_TIMEOUT_SECS",
        "RELAY_WHATSAPP_NOTIFY_TO",
        "RELAY_WA_TEMPLATE_NAME",
        "RELAY_WA_TEMPLATE_LANG",
        "RELAY_WA_SEND_TEMPLATE",
        "RELAY_WA_SEND_FORMATTED",
        "RELAY_WHATSAPP_PHONE_ID",
        "RELAY_WHATSAPP_API_VERSION",
        "RELAY_WOO_BASE_URL",
        "RELAY_WOO_UPDATE_ON_HOLD",
        "RELAY_WOO_TARGET_STATUS",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
