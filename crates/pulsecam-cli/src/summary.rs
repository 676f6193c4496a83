use std::path::Path;

use console::Style;
use pulsecam_core::io::record::CaptureRecord;
use pulsecam_core::pipeline::CompositePlan;
use pulsecam_core::signal::BpmEstimate;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    good: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            good: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

pub fn print_estimate_summary(estimate: &BpmEstimate, samples: usize, duration_sec: f64) {
    let s = Styles::new();
    print_title(&s, "Heart Rate");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Samples"),
        s.value.apply_to(samples)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Duration"),
        s.value.apply_to(format!("{duration_sec:.1} s"))
    );
    match estimate.bpm() {
        Some(bpm) => println!(
            "  {:<14}{}",
            s.label.apply_to("BPM"),
            s.good.apply_to(bpm)
        ),
        None => {
            let reason = estimate
                .rejection
                .map(|r| r.to_string())
                .unwrap_or_else(|| "rejected".to_string());
            println!(
                "  {:<14}{} {}",
                s.label.apply_to("BPM"),
                s.value.apply_to(estimate.value),
                s.disabled.apply_to(format!("(default, {reason})"))
            );
        }
    }
    println!();
}

pub fn print_plan_summary(plan: &CompositePlan, frame_interval_ms: f64) {
    let s = Styles::new();
    print_title(&s, "Capture Parameters");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Aperture"),
        s.value.apply_to(plan.aperture)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Heart rate"),
        s.value.apply_to(format!("{:.0} BPM", plan.bpm))
    );
    println!();

    println!("  {}", s.header.apply_to("Exposure"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Shutter"),
        s.value.apply_to(format!("{:.2} s", plan.exposure.duration_sec))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(plan.exposure.frame_count)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Weight"),
        s.value.apply_to(format!("{:.4}", plan.exposure.per_frame_weight))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Pacing"),
        s.value.apply_to(format!("{frame_interval_ms:.1} ms"))
    );
    println!();

    println!("  {}", s.header.apply_to("Look"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Brightness"),
        s.value.apply_to(format!("{:.3}", plan.look.tone.brightness))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Contrast"),
        s.value.apply_to(format!("{:.3}", plan.look.tone.contrast))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Saturation"),
        s.value.apply_to(format!("{:.3}", plan.look.tone.saturation))
    );
    if plan.look.blur_radius == 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Blur"),
            s.disabled.apply_to("none")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Blur"),
            s.value.apply_to(format!("{} px", plan.look.blur_radius))
        );
    }
    println!();
}

pub fn print_capture_summary(record: &CaptureRecord, output: &Path, plain: bool) {
    let s = Styles::new();

    let kind = if plain {
        s.disabled.apply_to("plain snapshot (composite failed)")
    } else {
        s.good.apply_to("composite")
    };
    println!(
        "  {:<14}{}",
        s.label.apply_to("Saved"),
        s.path.apply_to(output.display())
    );
    println!("  {:<14}{}", s.label.apply_to("Kind"), kind);
    println!(
        "  {:<14}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{}x{}", record.width, record.height))
    );
    match record.bpm {
        Some(bpm) => println!(
            "  {:<14}{}",
            s.label.apply_to("BPM"),
            s.value.apply_to(format!("{bpm:.0}"))
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("BPM"),
            s.disabled.apply_to("default")
        ),
    }
    println!();
}
