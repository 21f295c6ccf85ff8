use crate::cli::commands::open_session;
use crate::cli::parser::{Commands, ReportKind};
use crate::config::Config;
use crate::core::calculator::hours::format_hours;
use crate::core::reports::{
    ACTIVITY_DAYS, ReportRange, hours_by_day, hours_by_employee, system_stats, user_activity,
};
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::date::today;
use crate::utils::range::parse_range;
use crate::utils::table::Table;

/// `report` and `stats`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Report { kind, range } => {
            let range = match range.as_deref().map(parse_range).transpose()?.flatten() {
                Some((from, to)) => ReportRange::new(from, to)?,
                None if matches!(kind, ReportKind::Activity) => {
                    ReportRange::trailing(today(), ACTIVITY_DAYS)
                }
                None => ReportRange::month_to_date(today()),
            };

            let (pool, ctx) = open_session(cfg)?;

            match kind {
                ReportKind::ByEmployee => {
                    let rows = hours_by_employee(&pool.conn, &ctx, &range)?;
                    header(format!("Approved hours per employee, {} → {}", range.from, range.to));

                    let mut table = Table::new(&["Username", "Name", "Records", "Approved", "Hours"]);
                    for r in &rows {
                        table.add_row(vec![
                            r.username.clone(),
                            r.full_name.clone(),
                            r.submitted.to_string(),
                            r.days.to_string(),
                            format_hours(r.hours),
                        ]);
                    }
                    print!("{}", table.render());
                }
                ReportKind::Activity => {
                    let rows = user_activity(&pool.conn, &ctx, &range)?;
                    header(format!("User activity, {} → {}", range.from, range.to));

                    let mut table = Table::new(&["ID", "Username", "Name", "Role", "Records", "Hours"]);
                    for r in &rows {
                        table.add_row(vec![
                            r.user_id.to_string(),
                            r.username.clone(),
                            r.full_name.clone(),
                            r.role.to_string(),
                            r.submitted.to_string(),
                            format_hours(r.hours),
                        ]);
                    }
                    print!("{}", table.render());
                }
                ReportKind::ByDay => {
                    let rows = hours_by_day(&pool.conn, &ctx, &range)?;
                    header(format!("Approved hours per day, {} → {}", range.from, range.to));

                    if rows.is_empty() {
                        info("No approved hours in this range.");
                        return Ok(());
                    }

                    let mut table = Table::new(&["Date", "Employees", "Managers", "Admins", "Total"]);
                    for r in &rows {
                        table.add_row(vec![
                            r.date.format("%Y-%m-%d").to_string(),
                            format_hours(r.employee),
                            format_hours(r.manager),
                            format_hours(r.admin),
                            format_hours(r.total),
                        ]);
                    }
                    print!("{}", table.render());
                }
            }
        }

        Commands::Stats => {
            let (pool, ctx) = open_session(cfg)?;
            let s = system_stats(&pool.conn, &ctx)?;

            header("System statistics");
            println!(
                "Users      : {} ({} employees, {} managers, {} admins)",
                s.users.total, s.users.employees, s.users.managers, s.users.admins
            );
            println!(
                "Timesheets : {} ({} submitted, {} approved, {} rejected)",
                s.timesheets.total, s.timesheets.submitted, s.timesheets.approved, s.timesheets.rejected
            );
            if let (Some(first), Some(last)) = (&s.timesheets.first_date, &s.timesheets.last_date) {
                println!("Dates      : {first} → {last}");
            }
            println!("Audit log  : {} entries", s.audit_entries);
        }

        _ => {}
    }
    Ok(())
}
