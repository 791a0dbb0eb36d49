//! SVG chart drawing
//!
//! Renders a `ChartSpec` into a self-contained `<svg>` element. Output is a
//! pure function of its `ChartSpec`, so identical specs render byte-identical SVG.

use super::spec::{ChartKind, ChartSpec, Mapping};
use crate::aggregate::GroupKey;
use html_escape::encode_text;
use std::f64::consts::PI;

const WIDTH: f64 = 520.0;
const HEIGHT: f64 = 340.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 56.0;
const LEGEND_WIDTH: f64 = 130.0;
const Y_TICKS: usize = 5;

/// Series colors, cycled when there are more series than colors
const SERIES_COLORS: [&str; 8] = [
    "#636EFA", // Blue (primary)
    "#EF553B", // Red
    "#00CC96", // Green
    "#AB63FA", // Purple
    "#FFA15A", // Orange
    "#19D3F3", // Cyan
    "#FF6692", // Pink
    "#B6E880", // Lime
];

fn color(idx: usize) -> &'static str {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}

/// Render a chart spec as an SVG element
pub fn render_svg(spec: &ChartSpec) -> String {
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart chart-{kind}" viewBox="0 0 {w} {h}" width="{w}" height="{h}" role="img">"#,
        kind = kind_name(spec.kind),
        w = WIDTH,
        h = HEIGHT,
    );
    out.push_str(&format!(
        r#"<title>{t}</title><text x="{x}" y="24" text-anchor="middle" font-size="14" font-weight="bold">{t}</text>"#,
        t = encode_text(&spec.title),
        x = WIDTH / 2.0,
    ));

    if spec.data.is_empty() {
        draw_empty(&mut out);
    } else {
        match spec.kind {
            ChartKind::Line => draw_line(&mut out, spec),
            ChartKind::Bar => draw_bars(&mut out, spec),
            ChartKind::Pie => draw_pie(&mut out, spec),
        }
    }

    out.push_str("</svg>");
    out
}

fn kind_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Line => "line",
        ChartKind::Bar => "bar",
        ChartKind::Pie => "pie",
    }
}

fn draw_empty(out: &mut String) {
    out.push_str(&format!(
        r##"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="none" stroke="#ccc"/><text x="{cx}" y="{cy}" text-anchor="middle" fill="#888">No data</text>"##,
        x = MARGIN_LEFT,
        y = MARGIN_TOP,
        w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
        h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM,
        cx = WIDTH / 2.0,
        cy = HEIGHT / 2.0,
    ));
}

/// Format a number for axis ticks and legends
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 || v.abs() >= 1000.0 {
        format!("{:.0}", v)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format an exact value for a tooltip
fn format_value(v: f64) -> String {
    format!("{:.2}", v)
}

/// Plot area and value scale shared by line and bar charts
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn new(values: impl Iterator<Item = f64>, legend: bool) -> Self {
        let (mut lo, mut hi) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if lo == hi {
            hi = lo + 1.0;
        }
        // Headroom so the largest value doesn't touch the frame
        hi += (hi - lo) * 0.05;
        if lo < 0.0 {
            lo -= (hi - lo) * 0.05;
        }

        Self {
            left: MARGIN_LEFT,
            right: WIDTH - MARGIN_RIGHT - if legend { LEGEND_WIDTH } else { 0.0 },
            top: MARGIN_TOP,
            bottom: HEIGHT - MARGIN_BOTTOM,
            y_min: lo,
            y_max: hi,
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn y(&self, v: f64) -> f64 {
        self.bottom - (v - self.y_min) / (self.y_max - self.y_min) * (self.bottom - self.top)
    }

    fn draw_axes(&self, out: &mut String, x_label: &str, y_label: &str) {
        out.push_str(&format!(
            r##"<g class="axes" stroke="#444"><line x1="{l}" y1="{b}" x2="{r}" y2="{b}"/><line x1="{l}" y1="{t}" x2="{l}" y2="{b}"/></g>"##,
            l = self.left,
            r = self.right,
            t = self.top,
            b = self.bottom,
        ));

        for i in 0..=Y_TICKS {
            let v = self.y_min + (self.y_max - self.y_min) * i as f64 / Y_TICKS as f64;
            let y = self.y(v);
            out.push_str(&format!(
                r##"<line x1="{l}" y1="{y:.1}" x2="{r}" y2="{y:.1}" stroke="#eee"/><text x="{tx}" y="{ty:.1}" text-anchor="end" font-size="10">{label}</text>"##,
                l = self.left,
                r = self.right,
                tx = self.left - 6.0,
                ty = y + 3.0,
                label = format_number(v),
            ));
        }

        out.push_str(&format!(
            r#"<text x="{x}" y="{y}" text-anchor="middle" font-size="12">{label}</text>"#,
            x = (self.left + self.right) / 2.0,
            y = HEIGHT - 12.0,
            label = encode_text(x_label),
        ));
        out.push_str(&format!(
            r#"<text x="16" y="{y}" text-anchor="middle" font-size="12" transform="rotate(-90 16 {y})">{label}</text>"#,
            y = (self.top + self.bottom) / 2.0,
            label = encode_text(y_label),
        ));
    }

    fn x_tick(&self, out: &mut String, x: f64, label: &str) {
        out.push_str(&format!(
            r#"<text x="{x:.1}" y="{y}" text-anchor="middle" font-size="10">{label}</text>"#,
            y = self.bottom + 14.0,
            label = encode_text(label),
        ));
    }
}

fn axis_names(spec: &ChartSpec) -> (String, String) {
    match &spec.mapping {
        Mapping::Axes { x, y } => (
            spec.display_name(x).to_string(),
            spec.display_name(y).to_string(),
        ),
        Mapping::Slices { names, values } => (
            spec.display_name(names).to_string(),
            spec.display_name(values).to_string(),
        ),
    }
}

/// Show every label when there are few points, otherwise thin them out
fn label_stride(count: usize) -> usize {
    (count / 12).max(1)
}

fn draw_line(out: &mut String, spec: &ChartSpec) {
    let rows = &spec.data.rows;
    let frame = Frame::new(rows.iter().map(|r| r.value), false);
    let (x_label, y_label) = axis_names(spec);
    frame.draw_axes(out, &x_label, &y_label);

    // Numeric keys are placed proportionally, anything else evenly
    let numeric: Option<Vec<f64>> = rows
        .iter()
        .map(|r| r.keys.first().and_then(GroupKey::as_f64))
        .collect();
    let positions: Vec<f64> = match numeric {
        Some(xs) => {
            let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            xs.iter()
                .map(|x| {
                    if hi > lo {
                        frame.left + (x - lo) / (hi - lo) * frame.width()
                    } else {
                        frame.left + frame.width() / 2.0
                    }
                })
                .collect()
        }
        None => {
            let step = frame.width() / rows.len() as f64;
            (0..rows.len()).map(|i| frame.left + step * (i as f64 + 0.5)).collect()
        }
    };

    let points: Vec<String> = positions
        .iter()
        .zip(rows)
        .map(|(x, row)| format!("{:.1},{:.1}", x, frame.y(row.value)))
        .collect();
    out.push_str(&format!(
        r#"<polyline fill="none" stroke="{c}" stroke-width="2" points="{p}"/>"#,
        c = color(0),
        p = points.join(" "),
    ));

    let stride = label_stride(rows.len());
    for (i, (x, row)) in positions.iter().zip(rows).enumerate() {
        out.push_str(&format!(
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{c}"><title>{k}: {v}</title></circle>"#,
            y = frame.y(row.value),
            c = color(0),
            k = encode_text(&key_label(&row.keys)),
            v = format_value(row.value),
        ));
        if i % stride == 0 {
            let label = row.keys.first().map(ToString::to_string).unwrap_or_default();
            frame.x_tick(out, *x, &label);
        }
    }
}

fn key_label(keys: &[GroupKey]) -> String {
    keys.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn draw_bars(out: &mut String, spec: &ChartSpec) {
    let table = &spec.data;
    let series_position = spec
        .color_by
        .as_ref()
        .and_then(|c| table.key_columns.iter().position(|k| k == c));

    let categories = table.distinct_keys(0);
    let mut series = series_position
        .map(|p| table.distinct_keys(p))
        .unwrap_or_default();
    series.sort();

    let frame = Frame::new(table.rows.iter().map(|r| r.value), !series.is_empty());
    let (x_label, y_label) = axis_names(spec);
    frame.draw_axes(out, &x_label, &y_label);

    let band = frame.width() / categories.len() as f64;
    let slots = series.len().max(1);
    let bar_width = band * 0.8 / slots as f64;
    let zero = frame.y(0.0);

    for row in &table.rows {
        let Some(cat_idx) = row.keys.first().and_then(|k| categories.iter().position(|c| c == k)) else {
            continue;
        };
        let series_idx = series_position
            .and_then(|p| row.keys.get(p))
            .and_then(|k| series.iter().position(|s| s == k))
            .unwrap_or(0);

        let x = frame.left + band * cat_idx as f64 + band * 0.1 + bar_width * series_idx as f64;
        let y = frame.y(row.value);
        out.push_str(&format!(
            r#"<rect x="{x:.1}" y="{top:.1}" width="{w:.1}" height="{h:.1}" fill="{c}"><title>{k}: {v}</title></rect>"#,
            top = y.min(zero),
            w = bar_width,
            h = (zero - y).abs(),
            c = color(series_idx),
            k = encode_text(&key_label(&row.keys)),
            v = format_value(row.value),
        ));
    }

    let stride = label_stride(categories.len());
    for (i, category) in categories.iter().enumerate() {
        if i % stride == 0 {
            frame.x_tick(out, frame.left + band * (i as f64 + 0.5), &category.to_string());
        }
    }

    if let Some(column) = spec.color_by.as_deref() {
        let entries: Vec<String> = series.iter().map(ToString::to_string).collect();
        draw_legend(out, spec.display_name(column), &entries);
    }
}

fn draw_legend(out: &mut String, heading: &str, entries: &[String]) {
    let x = WIDTH - MARGIN_RIGHT - LEGEND_WIDTH + 10.0;
    out.push_str(&format!(
        r#"<g class="legend"><text x="{x}" y="{y}" font-size="11" font-weight="bold">{h}</text>"#,
        y = MARGIN_TOP,
        h = encode_text(heading),
    ));
    for (i, entry) in entries.iter().enumerate() {
        let y = MARGIN_TOP + 16.0 * (i as f64 + 1.0);
        out.push_str(&format!(
            r#"<rect x="{x}" y="{ry}" width="10" height="10" fill="{c}"/><text x="{tx}" y="{ty}" font-size="10">{e}</text>"#,
            ry = y - 9.0,
            c = color(i),
            tx = x + 14.0,
            ty = y,
            e = encode_text(entry),
        ));
    }
    out.push_str("</g>");
}

fn draw_pie(out: &mut String, spec: &ChartSpec) {
    let slices: Vec<(String, f64)> = spec
        .data
        .rows
        .iter()
        .filter(|r| r.value > 0.0)
        .map(|r| (key_label(&r.keys), r.value))
        .collect();
    let total: f64 = slices.iter().map(|(_, v)| v).sum();

    if slices.is_empty() || total <= 0.0 {
        draw_empty(out);
        return;
    }

    let cx = (WIDTH - LEGEND_WIDTH) / 2.0;
    let cy = (MARGIN_TOP + HEIGHT - 16.0) / 2.0;
    let radius = ((HEIGHT - MARGIN_TOP - 24.0) / 2.0).min(cx - 20.0);

    if slices.len() == 1 {
        out.push_str(&format!(
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{c}"><title>{n}: 100%</title></circle>"#,
            c = color(0),
            n = encode_text(&slices[0].0),
        ));
    } else {
        let mut angle = -PI / 2.0;
        for (i, (name, value)) in slices.iter().enumerate() {
            let sweep = value / total * 2.0 * PI;
            let (x1, y1) = (cx + radius * angle.cos(), cy + radius * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large_arc = if sweep > PI { 1 } else { 0 };

            out.push_str(&format!(
                r#"<path d="M{cx:.1},{cy:.1} L{x1:.1},{y1:.1} A{radius:.1},{radius:.1} 0 {large_arc} 1 {x2:.1},{y2:.1} Z" fill="{c}" stroke="white"><title>{n}: {pct:.1}%</title></path>"#,
                c = color(i),
                n = encode_text(name),
                pct = value / total * 100.0,
            ));
            angle = end;
        }
    }

    let entries: Vec<String> = slices
        .iter()
        .map(|(name, value)| format!("{} ({:.1}%)", name, value / total * 100.0))
        .collect();
    let (names, _) = axis_names(spec);
    draw_legend(out, &names, &entries);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{DerivedRow, DerivedTable, Reducer};

    fn table(keys: &[&str], rows: Vec<(Vec<GroupKey>, f64)>) -> DerivedTable {
        DerivedTable {
            key_columns: keys.iter().map(|k| k.to_string()).collect(),
            value_column: "Automobile_Sales".to_string(),
            reducer: Reducer::Mean,
            rows: rows
                .into_iter()
                .map(|(keys, value)| DerivedRow { keys, value })
                .collect(),
        }
    }

    #[test]
    fn test_line_chart_draws_polyline() {
        let data = table(
            &["Year"],
            vec![(vec![GroupKey::Int(1980)], 10.0), (vec![GroupKey::Int(1981)], 20.0)],
        );
        let svg = render_svg(&ChartSpec::line("Sales <trend>", data));

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("Sales &lt;trend&gt;"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn test_grouped_bars_with_legend() {
        let data = table(
            &["unemployment_rate", "Vehicle_Type"],
            vec![
                (vec![GroupKey::Real(3.5), "Sports".into()], 10.0),
                (vec![GroupKey::Real(3.5), "Trucks".into()], 20.0),
                (vec![GroupKey::Real(6.0), "Sports".into()], 15.0),
            ],
        );
        let spec = ChartSpec::bar("Unemployment", data)
            .color_by("Vehicle_Type")
            .label("unemployment_rate", "Unemployment Rate");
        let svg = render_svg(&spec);

        assert_eq!(svg.matches("<rect x").count(), 3 + 2);
        assert!(svg.contains("class=\"legend\""));
        assert!(svg.contains("Unemployment Rate"));
        assert!(svg.contains(SERIES_COLORS[1]));
    }

    #[test]
    fn test_pie_chart_slices() {
        let mut data = table(
            &["Vehicle_Type"],
            vec![(vec!["Sports".into()], 75.0), (vec!["Trucks".into()], 25.0)],
        );
        data.value_column = "Advertising_Expenditure".to_string();
        let svg = render_svg(&ChartSpec::pie("Share", data));

        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("Sports (75.0%)"));
        assert!(svg.contains("Trucks (25.0%)"));
    }

    #[test]
    fn test_single_slice_pie_is_circle() {
        let data = table(&["Vehicle_Type"], vec![(vec!["Sports".into()], 5.0)]);
        let svg = render_svg(&ChartSpec::pie("Share", data));
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_empty_chart_renders_placeholder() {
        let svg = render_svg(&ChartSpec::bar("Nothing", table(&["Vehicle_Type"], vec![])));
        assert!(svg.contains("No data"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let data = table(
            &["Vehicle_Type"],
            vec![(vec!["Sports".into()], 1.5), (vec!["Trucks".into()], 2.5)],
        );
        let spec = ChartSpec::bar("Bars", data);
        assert_eq!(render_svg(&spec), render_svg(&spec));
    }

    #[test]
    fn test_tooltips_keep_decimals() {
        let data = table(
            &["Vehicle_Type"],
            vec![(vec!["Sports".into()], 1200.456), (vec!["Trucks".into()], 3.5)],
        );
        let svg = render_svg(&ChartSpec::bar("Bars", data));

        assert!(svg.contains("<title>Sports: 1200.46</title>"));
        assert!(svg.contains("<title>Trucks: 3.50</title>"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1200.456), "1200");
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(0.126), "0.13");
    }
}
