use colored::Colorize;

use crate::safe_truncate;

/// Log HTTP request details for debugging (console output)
pub fn log_request(method: &str, url: &str, token: Option<&str>, body: Option<&[u8]>, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    println!("{}: {} {}", "Request".bright_yellow(), method, url);

    // Parse URL to show host and port
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        println!("{}: {}", "Host".bright_yellow(), parsed_url.host_str().unwrap_or("unknown"));
        println!("{}: {}", "Port".bright_yellow(), parsed_url.port().map(|p| p.to_string()).unwrap_or_else(||
            if parsed_url.scheme() == "https" { "443 (default)".to_string() } else { "80 (default)".to_string() }
        ));
        println!("{}: {}", "Scheme".bright_yellow(), parsed_url.scheme());
    }

    println!("\n{}", "Headers:".bright_yellow());
    println!("  Content-Type: application/json");
    match token {
        Some(token) => println!(
            "  Authorization: Bearer {}***",
            &token.chars().take(10).collect::<String>()
        ),
        None => println!("  (no session token stored)"),
    }

    if let Some(body) = body {
        println!("\n{}", "Request Body:".bright_yellow());
        // Try to pretty-print JSON, fall back to raw text
        match serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
        {
            Some(json) => {
                if json.chars().count() > 5000 {
                    println!("{}", safe_truncate(&json, 5000));
                    println!("\n{}", format!("... (truncated, total {} bytes)", json.len()).bright_black());
                } else {
                    println!("{}", json);
                }
            }
            None => println!("{}", String::from_utf8_lossy(body)),
        }
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(status: &reqwest::StatusCode, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    println!("{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    println!("\n{}", "Response Body:".bright_yellow());
    // Try to pretty-print JSON, fall back to raw text
    if let Ok(json_val) = serde_json::from_str::<serde_json::Value>(body) {
        match serde_json::to_string_pretty(&json_val) {
            Ok(pretty) => {
                if pretty.chars().count() > 5000 {
                    println!("{}", safe_truncate(&pretty, 5000));
                    println!("\n{}", format!("... (truncated, total {} bytes)", pretty.len()).bright_black());
                } else {
                    println!("{}", pretty);
                }
            }
            Err(_) => println!("{}", body),
        }
    } else {
        // Not JSON, show raw
        if body.chars().count() > 5000 {
            println!("{}", safe_truncate(body, 5000));
            println!("\n{}", format!("... (truncated, total {} bytes)", body.len()).bright_black());
        } else {
            println!("{}", body);
        }
    }

    println!("{}", "═".repeat(80).bright_green());
    println!();
}
