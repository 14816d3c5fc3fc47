//! Terminal dashboard: polls the REST API on fixed cadences and renders.
//!
//! The snapshot timer runs for the whole session; the process timer runs only
//! while its section is expanded. Poll results and key presses funnel through
//! one channel into the state machine, so results apply strictly in arrival
//! order.

use std::{io::Write, time::Duration};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{self, ClearType},
};
use tokio::sync::mpsc;
use tracing::*;

use crate::{
    collector::{interface::InterfaceInfo, process::ProcessInfo},
    stats::types::Snapshot,
};

use super::{format, poller::RepeatingTask, state::DashboardState};

#[derive(Debug, Parser)]
#[command(about = "Terminal dashboard polling a system-status-manager server")]
pub struct Args {
    /// Base URL of the system-status-manager server
    #[arg(
        long,
        value_name = "URL",
        default_value = "http://127.0.0.1:3040",
        env = "SSM_SERVER_URL"
    )]
    pub server: String,

    /// Snapshot poll period in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 1)]
    pub snapshot_period: u64,

    /// Process list poll period in seconds, active while the section is expanded
    #[arg(long, value_name = "SECONDS", default_value_t = 10)]
    pub process_period: u64,
}

enum Message {
    Snapshot(Result<Snapshot, String>),
    Processes(Result<Vec<ProcessInfo>, String>),
    Interfaces(Result<Vec<InterfaceInfo>, String>),
    Key(KeyEvent),
}

async fn fetch<T: serde::de::DeserializeOwned>(
    client: reqwest::Client,
    url: String,
) -> Result<T, String> {
    let response = client
        .get(&url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| error.to_string())?;
    response.json::<T>().await.map_err(|error| error.to_string())
}

pub async fn run(args: Args) -> Result<()> {
    let snapshot_period = Duration::from_secs(args.snapshot_period.max(1));
    let process_period = Duration::from_secs(args.process_period.max(1));
    let base_url = args.server.trim_end_matches('/').to_string();

    // Bound every poll below the snapshot period so a stuck call is gone
    // before the tick after next.
    let client = reqwest::Client::builder()
        .timeout(snapshot_period.mul_f32(0.9))
        .build()?;

    let (tx, mut rx) = mpsc::unbounded_channel();

    // Key events come from a blocking reader thread; the channel closing on
    // exit takes the thread down with it.
    {
        let tx = tx.clone();
        std::thread::spawn(move || loop {
            if matches!(crossterm::event::poll(Duration::from_millis(250)), Ok(true)) {
                if let Ok(Event::Key(key)) = crossterm::event::read() {
                    if tx.send(Message::Key(key)).is_err() {
                        break;
                    }
                }
            }
        });
    }

    terminal::enable_raw_mode()?;
    execute!(
        std::io::stdout(),
        terminal::EnterAlternateScreen,
        cursor::Hide
    )?;
    let _restore = scopeguard::guard((), |_| {
        let _ = execute!(
            std::io::stdout(),
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    });

    let mut state = DashboardState::new();
    let mut snapshot_timer = RepeatingTask::new("snapshot");
    let mut process_timer = RepeatingTask::new("processes");

    {
        let tx = tx.clone();
        let client = client.clone();
        let url = format!("{base_url}/stats");
        snapshot_timer.start(snapshot_period, move || {
            let tx = tx.clone();
            let client = client.clone();
            let url = url.clone();
            async move {
                let _ = tx.send(Message::Snapshot(fetch(client, url).await));
            }
        });
    }

    render(&state)?;

    while let Some(message) = rx.recv().await {
        match message {
            Message::Snapshot(result) => {
                if let Err(error) = &result {
                    warn!("Snapshot poll failed: {error}");
                }
                state.apply_snapshot(result);
            }
            Message::Processes(result) => {
                if let Err(error) = &result {
                    warn!("Process poll failed: {error}");
                }
                state.apply_processes(result);
            }
            Message::Interfaces(result) => {
                if let Err(error) = &result {
                    warn!("Interface fetch failed: {error}");
                }
                state.apply_interfaces(result);
            }
            Message::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('p') => {
                        if state.toggle_processes() {
                            let tx = tx.clone();
                            let client = client.clone();
                            let url = format!("{base_url}/processes");
                            process_timer.start(process_period, move || {
                                let tx = tx.clone();
                                let client = client.clone();
                                let url = url.clone();
                                async move {
                                    let _ = tx.send(Message::Processes(fetch(client, url).await));
                                }
                            });
                        } else {
                            process_timer.stop();
                        }
                    }
                    KeyCode::Char('i') => {
                        // One-shot fetch on expand, no timer for this section.
                        if state.toggle_interfaces() {
                            let tx = tx.clone();
                            let client = client.clone();
                            let url = format!("{base_url}/interfaces");
                            tokio::spawn(async move {
                                let _ = tx.send(Message::Interfaces(fetch(client, url).await));
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        render(&state)?;
    }

    snapshot_timer.stop();
    process_timer.stop();
    Ok(())
}

fn render(state: &DashboardState) -> std::io::Result<()> {
    let mut out = String::new();

    out.push_str("System Status\r\n");
    out.push_str("=============\r\n");

    if state.is_loading() {
        out.push_str("Loading system status...\r\n");
        if let Some(error) = &state.last_error {
            out.push_str(&format!("  last attempt: {error}\r\n"));
        }
    } else {
        let fallback = Snapshot::default();
        let snapshot = state.snapshot.as_ref().unwrap_or(&fallback);

        out.push_str(&format!(
            "CPU    {}   Uptime: {}\r\n",
            format::format_percent(snapshot.cpu_percent),
            format::format_uptime_opt(snapshot.uptime_seconds),
        ));
        out.push_str(&format!(
            "RAM    {}   Used: {} / Total: {}\r\n",
            format::format_percent(snapshot.ram_percent),
            format::format_gigabytes_opt(snapshot.ram_used_bytes),
            format::format_gigabytes_opt(snapshot.ram_total_bytes),
        ));
        out.push_str(&format!(
            "Temp   {} ({})\r\n",
            format::format_temperature(snapshot.cpu_temp_celsius),
            format::temperature_status(snapshot.cpu_temp_celsius),
        ));
        out.push_str(&format!(
            "Net    up {} / down {}   Sent: {} / Received: {}\r\n",
            format::format_speed_opt(snapshot.net_upload_bps),
            format::format_speed_opt(snapshot.net_download_bps),
            format::format_bytes_opt(snapshot.total_bytes_sent),
            format::format_bytes_opt(snapshot.total_bytes_recv),
        ));
        out.push_str(&format!(
            "Disk   {}   Used: {} / Total: {}\r\n",
            format::format_percent_whole(snapshot.main_disk_percent),
            format::format_gigabytes_opt(snapshot.main_disk_used_bytes),
            format::format_gigabytes_opt(snapshot.main_disk_total_bytes),
        ));
        out.push_str(&format!(
            "USB    {}   Used: {} / Total: {}\r\n",
            format::format_percent_whole(snapshot.usb_disk_percent),
            format::format_gigabytes_opt(snapshot.usb_disk_used_bytes),
            format::format_gigabytes_opt(snapshot.usb_disk_total_bytes),
        ));

        if let Some(error) = &state.last_error {
            out.push_str(&format!("\r\nPoll failed: {error}\r\n"));
        }
    }

    out.push_str(&format!(
        "\r\n[p] Processes ({})\r\n",
        if state.processes_expanded {
            "expanded"
        } else {
            "collapsed"
        }
    ));
    if state.processes_expanded {
        match &state.processes {
            Some(processes) if processes.is_empty() => {
                out.push_str("  No active processes found.\r\n")
            }
            Some(processes) => {
                for process in processes {
                    out.push_str(&format!(
                        "  {:<24} (PID: {:>6})  CPU: {}  Mem: {}\r\n",
                        process.name,
                        process.pid,
                        format::format_percent(Some(process.cpu_percent)),
                        format::format_percent(Some(process.memory_percent)),
                    ));
                }
            }
            None => out.push_str("  Fetching processes...\r\n"),
        }
    }

    out.push_str(&format!(
        "\r\n[i] Interfaces ({})\r\n",
        if state.interfaces_expanded {
            "expanded"
        } else {
            "collapsed"
        }
    ));
    if state.interfaces_expanded {
        match &state.interfaces {
            Some(interfaces) if interfaces.is_empty() => {
                out.push_str("  No network interfaces found.\r\n")
            }
            Some(interfaces) => {
                for interface in interfaces {
                    out.push_str(&format!(
                        "  {} ({})  MAC: {}\r\n",
                        interface.name,
                        interface.status,
                        interface.mac_address.as_deref().unwrap_or("--"),
                    ));
                    for address in &interface.ip_addresses {
                        out.push_str(&format!(
                            "    {}: {}/{}\r\n",
                            address.family, address.address, address.prefixlen
                        ));
                    }
                }
            }
            None => out.push_str("  Fetching interfaces...\r\n"),
        }
    }

    out.push_str("\r\n[q] Quit\r\n");

    let mut stdout = std::io::stdout();
    execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    stdout.write_all(out.as_bytes())?;
    stdout.flush()
}
