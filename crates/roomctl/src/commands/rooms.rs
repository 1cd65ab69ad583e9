//! Room command handlers.

use tabled::Tabled;

use roomctl_core::{Console, Device, LoadState, Room};

use crate::cli::{GlobalOpts, RoomsArgs, RoomsCommand};
use crate::error::CliError;
use crate::output;

use super::devices::DeviceRow;
use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Devices")]
    devices: usize,
}

impl From<&Room> for RoomRow {
    fn from(r: &Room) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            devices: r.devices.len(),
        }
    }
}

fn detail(r: &Room) -> String {
    let mut lines = vec![
        format!("ID:      {}", r.id),
        format!("Name:    {}", r.name),
        format!("Devices: {}", r.devices.len()),
    ];
    for d in &r.devices {
        lines.push(format!("  - {} (#{})", d.mac_address, d.id));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(console: &Console, args: RoomsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RoomsCommand::List => {
            let rooms = console.rooms().load().await?;
            let out = output::render_list(
                &global.output,
                rooms.as_slice(),
                |r| RoomRow::from(r),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Show { id } => {
            let view = console.room_detail();
            view.open(id).await?;
            let room = view.details().await?;
            let out = output::render_single(&global.output, &room, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Devices { id } => {
            let view = console.room_detail();
            let state = view.open(id).await?;
            match &state.state {
                LoadState::Empty if !global.quiet => {
                    eprintln!("Room {id} has no devices");
                }
                LoadState::Populated(devices) => {
                    let out = output::render_list(
                        &global.output,
                        devices,
                        |d| DeviceRow::from(d),
                        |d: &Device| d.mac_address.clone(),
                    );
                    output::print_output(&out, global.quiet);
                }
                _ => {}
            }
            Ok(())
        }

        RoomsCommand::Create { name, macs } => {
            let view = console.rooms();
            let room = view.create(&name, &macs).await?;
            if !global.quiet {
                eprintln!("Room created with ID {}", room.id);
            }
            Ok(())
        }

        RoomsCommand::Rename { id, name } => {
            let view = console.room_detail();
            view.open(id).await?;
            view.rename(&name).await?;
            Ok(())
        }

        RoomsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete room {id}?"), global.yes)? {
                return Ok(());
            }
            console.rooms().delete(id).await?;
            Ok(())
        }
    }
}
