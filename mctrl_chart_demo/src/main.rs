// Copyright 2025 the mCtrl Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart demos for `mctrl_chart`.
//!
//! Renders every chart kind into `mctrl_chart_demo_out/<kind>.svg`. Set
//! `RUST_LOG=mctrl_chart=debug` to watch surface creation and hot-item
//! changes.

mod svg;

use std::path::Path;
use std::time::Instant;

use kurbo::Size;
use mctrl_chart::{
    AxisSelector, Chart, ChartConfig, ChartKind, ChartNotify, ChartStyle, DataSetSource,
    SurfaceService,
};
use mctrl_text::{FontFamily, TextStyle};
use peniko::Color;
use tracing_subscriber::EnvFilter;

const OUT_DIR: &str = "mctrl_chart_demo_out";
const MONTHS: usize = 6;

/// Supplies the "Forecast" data set on demand.
#[derive(Debug)]
struct Forecast;

impl ChartNotify for Forecast {
    fn fetch_values(&mut self, set: usize, first: usize, last: usize, values: &mut [i32]) -> bool {
        tracing::debug!(set, first, last, "fetching forecast");
        for (slot, i) in values.iter_mut().zip(first..=last) {
            let month = i32::try_from(i).unwrap_or(i32::MAX);
            *slot = 10 + 4 * month;
        }
        true
    }
}

fn build_chart(kind: ChartKind) -> Chart {
    let (service, _) = svg::service();
    build_chart_with(kind, service)
}

fn build_chart_with(kind: ChartKind, service: SurfaceService) -> Chart {
    let config = ChartConfig::default()
        .with_text_style(TextStyle::new(11.0).with_family(FontFamily::SansSerif));
    let mut chart = Chart::with_config(service, ChartStyle::new(kind).with_tooltips(true), config);
    chart.set_title("Quarterly sales");
    chart.set_notify(Some(Box::new(Forecast)));

    let sets: [(&str, &[i32]); 3] = [
        ("Apples", &[12, 19, 25, 31, 28, 35]),
        ("Pears", &[8, 11, 9, 14, 21, 18]),
        ("Plums", &[-3, 4, 10, 7, 12, 16]),
    ];
    for (name, values) in sets {
        if let Ok(index) = chart.insert_data_set(usize::MAX, DataSetSource::Values(values)) {
            let _ = chart.set_data_set_legend(index, Some(name));
        }
    }
    if let Ok(index) = chart.insert_data_set(usize::MAX, DataSetSource::Virtual(MONTHS)) {
        let _ = chart.set_data_set_legend(index, Some("Forecast"));
        let _ = chart.set_data_set_color(index, Some(Color::from_rgb8(0x80, 0x80, 0x80)));
    }

    let _ = chart.set_axis_legend(AxisSelector::Primary, Some("Month"));
    let _ = chart.set_axis_legend(AxisSelector::Secondary, Some("Units"));
    if kind == ChartKind::Pie {
        let _ = chart.set_factor_exponent(AxisSelector::Primary, -1);
    }
    chart
}

fn render(kind: ChartKind, out_dir: &Path) -> std::io::Result<()> {
    let (service, frame) = svg::service();
    let mut chart = build_chart_with(kind, service);
    chart.resize(Size::new(480.0, 320.0));

    let body = chart.layout().body;
    chart.pointer_move(body.center());
    match chart.tracking_tooltip() {
        Some(tip) if tip.is_active() => {
            tracing::info!(kind = kind.name(), text = tip.text(), "tooltip at body center");
        }
        _ => tracing::info!(kind = kind.name(), "nothing hot at body center"),
    }

    chart.paint(Instant::now());
    let Some(svg) = frame.lock().take() else {
        tracing::warn!(kind = kind.name(), "no frame was presented");
        return Ok(());
    };

    let path = out_dir.join(format!("{}.svg", kind.name()));
    std::fs::write(&path, svg)?;
    println!("wrote {}", path.display());
    Ok(())
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let out_dir = Path::new(OUT_DIR);
    std::fs::create_dir_all(out_dir)?;
    for kind in ChartKind::ALL {
        render(kind, out_dir)?;
    }

    // Printing goes straight to a render target, without a surface.
    let mut chart = build_chart(ChartKind::StackedArea);
    chart.resize(Size::new(640.0, 400.0));
    let mut doc = svg::SvgDocument::new(chart.size());
    chart.print(&mut doc);
    let path = out_dir.join("printed.svg");
    std::fs::write(&path, doc.to_svg_string())?;
    println!("wrote {}", path.display());
    Ok(())
}
