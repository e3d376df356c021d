use pondx::{
    simple_supports, Loading, Member, Mirroring, PrimaryFraming, RoofBay, RoofBayError,
    SecondaryFraming, SteelBeamSize, SteelJoistSize, DEFAULT_ROOF_SLOPE,
};

/// Span of the girders in inches.
pub const PRIMARY_SPAN: f64 = 19.65 * 12.0;

/// Span of the beams and joists in inches.
pub const SECONDARY_SPAN: f64 = 20.0 * 12.0;

/// Surface dead load of 20 psf in k/in².
pub const DEAD_LOAD: f64 = 20.0 / 1000.0 / 144.0;

/// Static rain load of 22.4 psf at the drain inlet in k/in².
pub const RAIN_LOAD: f64 = 22.4 / 1000.0 / 144.0;

/// W16X26 girder.
fn w16x26() -> SteelBeamSize {
    SteelBeamSize::new("W16X26", 301.0, 7.68, 26.0)
}

/// W12X16 edge beam.
fn w12x16() -> SteelBeamSize {
    SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0)
}

/// 14K1 joist with an abbreviated live-load table around the 20 ft span.
fn joist_14k1() -> SteelJoistSize {
    SteelJoistSize::from_live_load_table("14K1", 5.2, &[(18.0, 229.0), (20.0, 177.0), (22.0, 140.0)])
}

/// Build the demonstration bay: two girders carrying a W12X16 at each edge and
/// three 14K1 joists in between.
///
/// The secondary members slope towards the first girder, which holds the drain.
/// Every member is simply supported, i.e. pinned at both ends as described in
/// <https://en.wikipedia.org/wiki/Simply_supported_beam>.
pub fn build_demo_bay() -> Result<RoofBay, RoofBayError> {
    // Both girders share the same span and section.
    let primary = (0..2)
        .map(|_| Member::new(PRIMARY_SPAN, &w16x26(), simple_supports(PRIMARY_SPAN)))
        .collect::<Result<Vec<_>, _>>()?;

    // Rolled beams sit on the edges where the deck needs a stiffer support,
    // with joists filling the interior.
    let beam = Member::new(SECONDARY_SPAN, &w12x16(), simple_supports(SECONDARY_SPAN))?;
    let joist = Member::new(SECONDARY_SPAN, &joist_14k1(), simple_supports(SECONDARY_SPAN))?;
    let secondary = vec![beam.clone(), joist.clone(), joist.clone(), joist, beam];

    RoofBay::new(
        PrimaryFraming::new(primary)?,
        SecondaryFraming::new(secondary, DEFAULT_ROOF_SLOPE)?,
        Loading::new(DEAD_LOAD, RAIN_LOAD, true),
        Mirroring::default(),
    )
}
