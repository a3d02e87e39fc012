//! Edit-contact command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use tablebook::ReservationId;

/// Change the guest details of a reservation.
///
/// Fields left out keep their current value; `--email ""` clears the email.
#[derive(Args)]
pub struct EditContactCommand {
    /// Reservation id
    pub reservation_id: ReservationId,

    /// Guest first name
    #[arg(long)]
    pub name: Option<String>,

    /// Guest last name
    #[arg(long)]
    pub surname: Option<String>,

    /// Guest phone (380 followed by 9 digits)
    #[arg(long)]
    pub phone: Option<String>,

    /// Guest email
    #[arg(long)]
    pub email: Option<String>,
}

impl EditContactCommand {
    /// Execute the edit-contact command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.name.is_none()
            && self.surname.is_none()
            && self.phone.is_none()
            && self.email.is_none()
        {
            return Err(CliError::InvalidArguments(
                "Nothing to change: pass at least one of --name, --surname, --phone, --email"
                    .to_string(),
            ));
        }

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let mut contact = db.require_reservation(self.reservation_id)?.contact().clone();
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(surname) = self.surname {
            contact.surname = surname;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
        if let Some(email) = self.email {
            contact.email = Some(email);
        }

        let updated = db.update_contact(self.reservation_id, &contact)?;

        if !global.quiet {
            eprintln!(
                "Updated reservation {}: {} {}",
                updated.id(),
                updated.contact().full_name(),
                updated.contact().phone
            );
        }
        Ok(())
    }
}
