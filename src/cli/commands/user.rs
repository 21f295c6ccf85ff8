use crate::cli::commands::open_session;
use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::core::input::{NewUser, UserUpdate};
use crate::core::users::{create_user, delete_user, list_users, update_user};
use crate::errors::AppResult;
use crate::models::role::Role;
use crate::ui::messages::success;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::User { action } = cmd else {
        return Ok(());
    };

    match action {
        UserAction::Add {
            username,
            email,
            password,
            first_name,
            last_name,
            role,
            employee_type,
        } => {
            let new = NewUser {
                username: username.trim().to_string(),
                email: email.trim().to_string(),
                password: password.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                role: role.parse::<Role>()?,
                employee_type: employee_type.clone(),
            };
            new.validate()?;

            let (pool, ctx) = open_session(cfg)?;
            let user = create_user(&pool.conn, &ctx, &new)?;
            success(format!("User '{}' created with id {} ({})", user.username, user.id, user.role));
        }

        UserAction::Edit {
            id,
            username,
            email,
            password,
            first_name,
            last_name,
            role,
            employee_type,
        } => {
            let update = UserUpdate {
                username: username.clone(),
                email: email.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                role: role.as_deref().map(str::parse::<Role>).transpose()?,
                employee_type: employee_type.clone(),
                password: password.clone(),
            };
            update.validate()?;

            let (pool, ctx) = open_session(cfg)?;
            let user = update_user(&pool.conn, &ctx, *id, &update)?;
            success(format!("User '{}' updated", user.username));
        }

        UserAction::Delete { id } => {
            let (pool, ctx) = open_session(cfg)?;
            let user = delete_user(&pool.conn, &ctx, *id)?;
            success(format!("User '{}' deleted with their timesheets", user.username));
        }

        UserAction::List => {
            let (pool, ctx) = open_session(cfg)?;
            let users = list_users(&pool.conn, &ctx)?;

            let mut table = Table::new(&["ID", "Username", "Email", "Name", "Role", "Type"]);
            for u in &users {
                table.add_row(vec![
                    u.id.to_string(),
                    u.username.clone(),
                    u.email.clone(),
                    u.full_name(),
                    u.role.to_string(),
                    u.employee_type.clone().unwrap_or_default(),
                ]);
            }
            print!("{}", table.render());
        }
    }
    Ok(())
}
