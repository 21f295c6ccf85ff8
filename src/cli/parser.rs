use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for timeportal
/// Timesheets on bi-weekly pay periods, with manager approval and an audit trail
#[derive(Parser)]
#[command(
    name = "timeportal",
    version = env!("CARGO_PKG_VERSION"),
    about = "Timesheet portal: submit bi-weekly periods, approve them and audit every change (SQLite)",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Print the current configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,
    },

    /// Database maintenance (migrations, integrity check, information)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show applied migrations and row counts")]
        info: bool,
    },

    /// Create the default accounts, codes and modifiers
    Seed,

    /// Open a session
    Login {
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Close the current session
    Logout,

    /// Show the user of the current session
    Whoami,

    /// Show a pay period with your recorded days
    Period {
        #[arg(long, short, help = "Period number (1-26), default: current")]
        period: Option<u32>,

        #[arg(long, short, help = "Year, default: current")]
        year: Option<i32>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Submit days of a pay period
    Submit {
        #[arg(long, short, help = "Period number (1-26), default: current")]
        period: Option<u32>,

        #[arg(long, short, help = "Year, default: current")]
        year: Option<i32>,

        /// Day as DATE,START,END,CODE[,BREAK[,MOD;MOD]] (repeatable)
        #[arg(long = "day", short = 'd', value_name = "DAY", required = true)]
        days: Vec<String>,
    },

    /// Edit one of your submitted records
    Edit {
        id: i64,

        #[arg(long = "start", help = "Start time (HH:MM)")]
        start: Option<String>,

        #[arg(long = "end", help = "End time (HH:MM)")]
        end: Option<String>,

        #[arg(long = "break", help = "Break in minutes")]
        break_minutes: Option<i64>,

        #[arg(long)]
        code: Option<String>,

        #[arg(long = "mods", help = "Modifiers, separated by ';' (empty clears them)")]
        modifiers: Option<String>,

        #[arg(long = "desc")]
        description: Option<String>,
    },

    /// List timesheet records (most recent first)
    List {
        #[arg(long, help = "User id (managers and admins)")]
        user: Option<i64>,

        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        range: Option<String>,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Records waiting for a decision
    Pending,

    /// Approve a submitted record
    Approve { id: i64 },

    /// Reject a submitted record
    Reject { id: i64 },

    /// Approved-hours reports
    Report {
        #[arg(value_enum)]
        kind: ReportKind,

        #[arg(long, short, help = "Year/month/day or a custom range, default: month to date (activity: last 30 days)")]
        range: Option<String>,
    },

    /// Users, timesheets and audit volume
    Stats,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage day codes
    Code {
        #[command(subcommand)]
        action: CodeAction,
    },

    /// Manage modifiers
    Modifier {
        #[command(subcommand)]
        action: ModifierAction,
    },

    /// Export data to CSV or JSON
    Export {
        #[arg(value_enum)]
        kind: ExportKindArg,

        #[arg(long, default_value = "csv", help = "csv or json")]
        format: String,

        #[arg(long, value_name = "FILE", help = "Absolute output path")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter timesheets or audit entries by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, help = "Timesheets of this user id only")]
        user: Option<i64>,

        #[arg(long, value_enum, help = "Timesheets with this status only")]
        status: Option<StatusArg>,

        #[arg(long, help = "Audit entries with this action only")]
        action: Option<String>,

        #[arg(long, help = "Audit entries whose username contains this text")]
        username: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the audit log (newest first)
    Log {
        #[arg(long, help = "Only this action (create, update, approve, login_failed, ...)")]
        action: Option<String>,

        #[arg(long, help = "Username contains this text")]
        username: Option<String>,

        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        range: Option<String>,

        #[arg(long, default_value_t = 50, help = "Maximum number of entries (0 = all)")]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create an account
    Add {
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long = "first")]
        first_name: String,

        #[arg(long = "last")]
        last_name: String,

        #[arg(long, default_value = "employee")]
        role: String,

        #[arg(long = "type", help = "Employee type: regulier or hebdomadaire")]
        employee_type: Option<String>,
    },

    /// Change an account
    Edit {
        id: i64,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,

        #[arg(long = "first")]
        first_name: Option<String>,

        #[arg(long = "last")]
        last_name: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long = "type")]
        employee_type: Option<String>,
    },

    /// Delete an account and its timesheets
    Delete { id: i64 },

    /// List accounts
    List,
}

#[derive(Subcommand)]
pub enum CodeAction {
    Add { name: String },
    List,
}

#[derive(Subcommand)]
pub enum ModifierAction {
    /// Create a modifier with a signed offset in minutes
    Add {
        name: String,

        #[arg(allow_hyphen_values = true)]
        minutes: i64,
    },

    /// Change a modifier's offset
    Set {
        name: String,

        #[arg(allow_hyphen_values = true)]
        minutes: i64,
    },

    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Submitted,
    Approved,
    Rejected,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportKind {
    /// Approved hours per employee
    ByEmployee,
    /// Approved hours per day and role
    ByDay,
    /// Records and approved hours of every account (default: last 30 days)
    Activity,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportKindArg {
    Users,
    Timesheets,
    Complete,
    Audit,
}
