//! User and role command handlers.

use serde::Serialize;
use tabled::Tabled;

use roomctl_core::{Console, User, UserActions, UsersView};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

/// A user plus the actions the current session may take on it.
#[derive(Serialize)]
struct UserEntry {
    #[serde(flatten)]
    user: User,
    actions: UserActions,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Banned")]
    banned: String,
    #[tabled(rename = "Actions")]
    actions: String,
}

impl From<&UserEntry> for UserRow {
    fn from(e: &UserEntry) -> Self {
        let mut actions = Vec::new();
        if e.actions.promote {
            actions.push("promote");
        }
        if e.actions.ban {
            actions.push("ban");
        }
        if e.actions.unban {
            actions.push("unban");
        }
        Self {
            id: e.user.id,
            username: e.user.username.clone(),
            role: e.user.role.to_string(),
            banned: if e.user.is_banned { "yes" } else { "no" }.into(),
            actions: if actions.is_empty() {
                "-".into()
            } else {
                actions.join(", ")
            },
        }
    }
}

fn entries(view: &UsersView, users: Vec<User>) -> Vec<UserEntry> {
    users
        .into_iter()
        .map(|user| UserEntry {
            actions: view.actions_for(&user),
            user,
        })
        .collect()
}

pub async fn handle(console: &Console, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let view = console.users();
    let users = view.load().await?;

    match args.command {
        UsersCommand::List { search } => {
            let shown = match search {
                Some(term) => view.filter(&term),
                None => users.as_ref().clone(),
            };
            let rows = entries(&view, shown);
            let out = output::render_list(
                &global.output,
                &rows,
                |e| UserRow::from(e),
                |e| e.user.username.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Promote { username } => {
            if !util::confirm(&format!("Promote {username} to admin?"), global.yes)? {
                return Ok(());
            }
            view.promote(&username).await?;
            Ok(())
        }

        UsersCommand::Ban { username } => {
            if !util::confirm(&format!("Ban {username}?"), global.yes)? {
                return Ok(());
            }
            view.ban(&username).await?;
            Ok(())
        }

        UsersCommand::Unban { username } => {
            view.unban(&username).await?;
            Ok(())
        }
    }
}
