use heliostat_field::prelude::*;
use heliostat_field_examples::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = FieldConfig::default();
    let mut sink = FnSink::new(|event| match event {
        LayoutEvent::GroupOpened {
            group,
            angular_unit,
            first_radius,
        } => println!(
            "group {group:>2} opened at {first_radius:8.3} m, unit {:.4} deg",
            angular_unit.to_degrees()
        ),
        LayoutEvent::RingAdded {
            group,
            ring,
            radius,
            kind,
        } => println!("group {group:>2} ring {ring:>2} {kind:?} at {radius:8.3} m"),
        LayoutEvent::GapCorrected {
            group,
            computed,
            corrected,
        } => println!("group {group:>2} first ring moved {computed:.3} -> {corrected:.3} m"),
        LayoutEvent::GroupPlaced {
            group,
            heliostats,
            max_index,
        } => println!("group {group:>2} placed {heliostats} heliostats (max slot {max_index})"),
        LayoutEvent::GrowthTerminated {
            terminal_radius,
            groups,
        } => println!("growth stopped at {terminal_radius:.3} m with {groups} groups"),
        _ => {}
    });

    let layout = generate_layout_with_events(&config, &mut sink)?;
    println!("{}", layout.summary());
    Ok(())
}
