//! `grocer locations`

use std::io::Write;

use clap::Args;

use grocer::checkout::ShippingAddress;
use grocer_app::context::AppContext;

use crate::errors::CliError;

#[derive(Debug, Args)]
pub(crate) struct LocationsArgs {
    /// List the districts of this division
    #[arg(long)]
    division: Option<String>,

    /// List the upazilas of this district (requires --division)
    #[arg(long, requires = "division")]
    district: Option<String>,
}

pub(super) fn run(
    args: &LocationsArgs,
    ctx: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let locations = &ctx.locations;

    let Some(division) = &args.division else {
        for name in locations.divisions() {
            writeln!(out, "{name}")?;
        }

        return Ok(());
    };

    let mut address = ShippingAddress::default();
    locations.select_division(&mut address, division)?;

    let Some(district) = &args.district else {
        for name in locations.districts(&address.division) {
            writeln!(out, "{name}")?;
        }

        return Ok(());
    };

    locations.select_district(&mut address, district)?;

    for name in locations.upazilas(&address.division, &address.district) {
        writeln!(out, "{name}")?;
    }

    Ok(())
}
