// src/services/export.rs
// File exports: the traced track as standalone canvas drawing code, the
// obstacle layout as JSON, and target paths for window snapshots.

use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use nannou::prelude::*;

use crate::draw::hex_string;
use crate::models::{Obstacle, ObstacleSet, TracePath};
use crate::render::CurbStyle;
use crate::utilities::spline::Smoothing;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize obstacles: {0}")]
    Json(#[from] serde_json::Error),
}

/// Milliseconds since the epoch; used to keep export names unique.
pub fn timestamp() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

pub fn export_file_name(stem: &str, extension: &str, stamp: u128) -> String {
    format!("{}_{}.{}", stem, stamp, extension)
}

pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Where the next canvas snapshot goes. The directory is created here;
    /// the image itself is written by the capture service.
    pub fn image_path(&self) -> Result<PathBuf, ExportError> {
        self.target(&export_file_name("track", "png", timestamp()))
    }

    pub fn write_code(
        &self,
        paths: &[TracePath],
        smoothing: Smoothing,
        style: &CurbStyle,
    ) -> Result<PathBuf, ExportError> {
        let stamp = timestamp();
        let path = self.target(&export_file_name("track-draw", "js", stamp))?;
        let code = export_code(paths, smoothing, style, stamp);
        self.write(path, code)
    }

    pub fn write_obstacles(&self, obstacles: &ObstacleSet) -> Result<PathBuf, ExportError> {
        let json = obstacles_json(obstacles)?;
        log::info!("Obstacle layout:\n{}", json);
        let path = self.target(&export_file_name("obstacles", "json", timestamp()))?;
        self.write(path, json)
    }

    fn target(&self, file_name: &str) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        Ok(self.output_dir.join(file_name))
    }

    fn write(&self, path: PathBuf, contents: String) -> Result<PathBuf, ExportError> {
        fs::write(&path, contents).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("Exported {}", path.display());
        Ok(path)
    }
}

#[derive(Serialize)]
struct ObstacleRecord {
    x: i64,
    y: i64,
    angle_degrees: i64,
    angle_radians: String,
    length: i64,
}

impl From<&Obstacle> for ObstacleRecord {
    fn from(o: &Obstacle) -> Self {
        Self {
            x: o.position.x.round() as i64,
            y: o.position.y.round() as i64,
            angle_degrees: o.angle.to_degrees().round() as i64,
            angle_radians: format!("{:.3}", o.angle),
            length: o.length.round() as i64,
        }
    }
}

#[derive(Serialize)]
struct ObstacleLayout {
    obstacles: Vec<ObstacleRecord>,
}

pub fn obstacles_json(obstacles: &ObstacleSet) -> Result<String, serde_json::Error> {
    let layout = ObstacleLayout {
        obstacles: obstacles.iter().map(ObstacleRecord::from).collect(),
    };
    serde_json::to_string_pretty(&layout)
}

/// JavaScript module that redraws the traced track on any 2D canvas context.
/// Colors are the resolved ones the app draws with. Only the generated-at line
/// depends on `stamp`.
pub fn export_code(
    paths: &[TracePath],
    smoothing: Smoothing,
    style: &CurbStyle,
    stamp: u128,
) -> String {
    let smoothed: Vec<Vec<Point2>> = paths.par_iter().map(|p| smoothing.apply(p)).collect();

    let mut code = String::new();
    code.push_str("// track-draw.js, generated by kinesis\n");
    let _ = writeln!(code, "// generated at {} ms since the unix epoch", stamp);
    code.push_str("// drawTrackSmoothed(ctx) draws the smoothed track, drawTrackRaw(ctx) the clicked points\n\n");

    let _ = writeln!(code, "const _ASPHALT_COLOR = \"{}\";", hex_string(style.asphalt));
    let _ = writeln!(code, "const _ASPHALT_WIDTH = {};", style.asphalt_width);
    let _ = writeln!(code, "const _CURB_WIDTH = {};", style.curb_width);
    let _ = writeln!(code, "const _CURB_PRIMARY = \"{}\";", hex_string(style.curb_primary));
    let _ = writeln!(code, "const _CURB_SECONDARY = \"{}\";", hex_string(style.curb_secondary));
    let _ = writeln!(code, "const _DASH = {};", style.dash);
    let _ = writeln!(code, "const _GAP = {};\n", style.gap);

    code.push_str("// Raw paths (clicked points)\n");
    write_table(&mut code, "RAW_PATHS", paths);
    code.push_str("// Smoothed paths\n");
    write_table(&mut code, "SMOOTH_PATHS", &smoothed);

    code.push_str(DRAW_HELPER);
    code.push_str(ENTRY_POINTS);
    code
}

fn write_table(code: &mut String, name: &str, paths: &[Vec<Point2>]) {
    let _ = writeln!(code, "const {} = [", name);
    for (i, path) in paths.iter().enumerate() {
        let points: Vec<String> = path
            .iter()
            .map(|p| format!("{{x:{:.2},y:{:.2}}}", p.x, p.y))
            .collect();
        let sep = if i + 1 == paths.len() { "" } else { "," };
        let _ = writeln!(code, "  [{}]{}", points.join(","), sep);
    }
    code.push_str("];\n\n");
}

const DRAW_HELPER: &str = "\
function _strokePath(ctx, pts) {
  ctx.beginPath();
  ctx.moveTo(pts[0].x, pts[0].y);
  for (let i = 1; i < pts.length; i++) ctx.lineTo(pts[i].x, pts[i].y);
  ctx.stroke();
}

function _drawPathWithCurbs(ctx, pts) {
  if (!pts || pts.length < 2) return;
  ctx.save();
  ctx.lineJoin = 'round';
  ctx.lineCap = 'round';

  ctx.strokeStyle = _CURB_PRIMARY;
  ctx.lineWidth = _CURB_WIDTH;
  ctx.setLineDash([_DASH, _GAP]);
  ctx.lineDashOffset = 0;
  _strokePath(ctx, pts);

  ctx.strokeStyle = _CURB_SECONDARY;
  ctx.lineDashOffset = _DASH;
  _strokePath(ctx, pts);

  ctx.strokeStyle = _ASPHALT_COLOR;
  ctx.lineWidth = _ASPHALT_WIDTH;
  ctx.setLineDash([]);
  _strokePath(ctx, pts);
  ctx.restore();
}

";

const ENTRY_POINTS: &str = "\
export function drawTrackSmoothed(ctx) {
  if (!ctx) throw new Error('ctx is required');
  for (let i = 0; i < SMOOTH_PATHS.length; i++) {
    _drawPathWithCurbs(ctx, SMOOTH_PATHS[i]);
  }
}

export function drawTrackRaw(ctx) {
  if (!ctx) throw new Error('ctx is required');
  for (let i = 0; i < RAW_PATHS.length; i++) {
    _drawPathWithCurbs(ctx, RAW_PATHS[i]);
  }
}

export default drawTrackSmoothed;
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TraceStyle;
    use crate::models::{Obstacle, TraceSession};
    use std::f32::consts::PI;

    fn table_lines<'a>(code: &'a str, name: &str) -> Vec<&'a str> {
        code.lines()
            .skip_while(|l| !l.starts_with(&format!("const {} = [", name)))
            .skip(1)
            .take_while(|l| *l != "];")
            .collect()
    }

    #[test]
    fn test_traced_session_exports_raw_and_smoothed() {
        let mut session = TraceSession::new();
        session.click(pt2(10.0, 10.0));
        session.click(pt2(50.0, 10.0));
        session.click(pt2(50.0, 50.0));
        session.finish().unwrap();

        let smoothing = Smoothing::default();
        let code = export_code(session.paths(), smoothing, &CurbStyle::default(), 1);

        let raw = table_lines(&code, "RAW_PATHS");
        assert_eq!(raw, vec!["  [{x:10.00,y:10.00},{x:50.00,y:10.00},{x:50.00,y:50.00}]"]);

        let smooth = table_lines(&code, "SMOOTH_PATHS");
        assert_eq!(smooth.len(), 1);
        let count = smooth[0].matches("{x:").count();
        assert!(count >= (3 - 1) * smoothing.segments);
        assert!(smooth[0].ends_with("{x:50.00,y:50.00}]"));

        assert!(code.contains("export function drawTrackSmoothed(ctx)"));
        assert!(code.contains("export function drawTrackRaw(ctx)"));
        assert!(code.contains("export default drawTrackSmoothed;"));
        assert!(code.contains("const _ASPHALT_COLOR = \"#2c2c2e\";"));
        assert!(code.contains("const _CURB_WIDTH = 60;"));
    }

    #[test]
    fn test_code_is_stable_apart_from_stamp() {
        let paths = vec![vec![pt2(1.234, 5.678), pt2(9.0, 9.0)], vec![]];
        let style = CurbStyle::default();
        let a = export_code(&paths, Smoothing::default(), &style, 1);
        let b = export_code(&paths, Smoothing::default(), &style, 2);
        assert_ne!(a, b);

        let strip = |s: &str| -> String {
            s.lines()
                .filter(|l| !l.starts_with("// generated at"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(strip(&a), strip(&b));
        // empty paths stay as empty rows
        assert_eq!(table_lines(&a, "RAW_PATHS")[1], "  []");
    }

    #[test]
    fn test_code_uses_the_colors_drawn_on_screen() {
        let style = CurbStyle::from_config(&TraceStyle {
            curb_primary: "red\"; alert(1); \"".to_string(),
            curb_secondary: "#00FF00".to_string(),
            ..TraceStyle::default()
        });
        let code = export_code(&[], Smoothing::default(), &style, 1);
        let fallback = TraceStyle::default().curb_primary.to_lowercase();
        assert!(code.contains(&format!("const _CURB_PRIMARY = \"{}\";", fallback)));
        assert!(code.contains("const _CURB_SECONDARY = \"#00ff00\";"));
        assert!(!code.contains("alert"));
    }

    #[test]
    fn test_obstacle_json_shape() {
        let mut o = Obstacle::new(5, pt2(12.4, -7.6));
        o.angle = PI / 12.0;
        let json = obstacles_json(&ObstacleSet::new().with_added(o)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value["obstacles"][0];
        assert_eq!(first["x"], 12);
        assert_eq!(first["y"], -8);
        assert_eq!(first["angle_degrees"], 15);
        assert_eq!(first["angle_radians"], "0.262");
        assert_eq!(first["length"], 60);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(export_file_name("track", "png", 42), "track_42.png");
        assert_eq!(export_file_name("track-draw", "js", 7), "track-draw_7.js");
    }

    #[test]
    fn test_write_obstacles_creates_dir() {
        let dir = std::env::temp_dir().join(format!("kinesis-export-{}", timestamp()));
        let exporter = Exporter::new(&dir);
        let path = exporter.write_obstacles(&ObstacleSet::new()).unwrap();
        assert!(path.starts_with(&dir));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"obstacles\": []"));
        let _ = fs::remove_dir_all(&dir);
    }
}
