/*
 * Teacher Dashboard, keeping class tracking organized
 * Copyright (C) 2019-2020 Adrien 'Litarvan' Navratil
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use log::{info, warn, error, LevelFilter};
use fern::colors::{ColoredLevelConfig, Color};

use teacher_dashboard::{Activation, App, Page};
use teacher_dashboard::config::CONFIG;
use teacher_dashboard::route::Route;
use teacher_dashboard::utils::is_env_enable;

const VERSION: &str = "0.1.0";

#[actix_rt::main]
async fn main() {
    let is_debug = is_env_enable("DASHBOARD_DEBUG");

    if let Err(e) = setup_logger(is_debug) {
        eprintln!("Couldn't initialize logger : {}", e);
        return;
    }

    info!("Teacher Dashboard v{}", VERSION);

    let app = match App::from_config(&CONFIG) {
        Ok(a) => a,
        Err(e) => {
            error!("Couldn't set up the HTTP client : {}", e);
            return;
        }
    };

    info!("Dashboard API at '{}', auth at '{}'", app.config().api_url, app.config().auth_url);

    if is_debug {
        match app.api().debug_data().await {
            Ok(data) => info!("Backend debug data : {}", data),
            Err(e) => warn!("{}", e.to_detailed_string())
        }
    }

    let route = std::env::args().nth(1)
        .map(|path| Route::parse(&path))
        .unwrap_or(Route::Dashboard);

    match app.activate(route) {
        Activation::Redirect(to) => info!("Not signed in, '{}' redirects to '{}'", route, to),
        Activation::Render(page) => {
            page.mount().await;
            describe(&page);
        }
    }
}

fn describe(page: &Page) {
    if let Some(session) = page.session() {
        info!("Signed in as {}", session);
    }

    match page {
        Page::Dashboard(p) => {
            let view = p.view();
            match (view.hint, view.stats) {
                (Some(hint), _) => info!("{}", hint),
                (None, Some(stats)) => info!("Class stats :\n{}", stats),
                (None, None) => warn!("No stats for the selected class")
            }
        },
        Page::Queries(p) => {
            let queries = p.view().queries;
            info!("{} pending queries", queries.len());

            for q in &queries {
                info!("  {} ({}) : {}", q.student_name, q.subject, q.message);
            }
        },
        Page::FaMode(p) => info!("{} FA modes available", p.view().modes.len()),
        Page::Login(p) => info!("{} login", p.role()),
        Page::Signup(p) => info!("{} sign-up", p.role()),
        _ => info!("Page ready")
    }
}

const LOG_FILE: &str = "dashboard.log";
const TARGET_WIDTH: usize = 36;

/// Right-aligns module paths so messages line up, long ones keep their tail.
fn aligned_target(target: &str) -> String {
    let target = target.strip_prefix("teacher_dashboard::").unwrap_or(target);

    match target.len().checked_sub(TARGET_WIDTH) {
        Some(0) | None => format!("{:>width$}", target, width = TARGET_WIDTH),
        Some(extra) => format!("..{}", &target[extra + 2..])
    }
}

fn setup_logger(debug: bool) -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig::new()
        .debug(Color::Cyan)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {} > {}",
                chrono::Local::now().format("(%H:%M:%S%.3f)"),
                colors.color(record.level()),
                aligned_target(record.target()),
                message
            ))
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{:<5}] [{}] | {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S%.3f]"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(fern::log_file(LOG_FILE)?);

    // Controllers log stale answers and abandoned submissions at debug
    let base = if debug {
        fern::Dispatch::new()
            .level(LevelFilter::Warn)
            .level_for("teacher_dashboard", LevelFilter::Debug)
            .level_for("teacher_dashboard::api::http", LevelFilter::Trace)
            .level_for("reqwest", LevelFilter::Debug)
    } else {
        fern::Dispatch::new()
            .level(LevelFilter::Warn)
            .level_for("teacher_dashboard", LevelFilter::Info)
            .level_for("teacher_dashboard::controller", LevelFilter::Warn)
    };

    base.chain(file)
        .chain(console)
        .apply()?;

    Ok(())
}
