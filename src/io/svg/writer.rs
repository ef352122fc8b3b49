use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use geo::Rect;

pub(crate) struct SvgWriter {
    writer: BufWriter<File>
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl Write for SvgWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.writer.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.writer.flush() }
}

impl SvgWriter {
    pub(crate) fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("[to_svg] Failed to create {}", path.display()))?;

        Ok(Self { writer: BufWriter::new(file) })
    }

    /// XML declaration and opening <svg> tag. The planar extent is recorded
    /// as data attributes so the picture can be mapped back to coordinates.
    pub(crate) fn write_header(&mut self, width: f64, height: f64, scale: f64, bounds: &Rect<f64>) -> Result<()> {
        writeln!(self, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
        writeln!(self, r##"<svg xmlns="http://www.w3.org/2000/svg"
            width="{width}" height="{height}"
            viewBox="0 0 {width} {height}"
            data-x-min="{x_min}" data-x-max="{x_max}"
            data-y-min="{y_min}" data-y-max="{y_max}"
            data-scale="{scale}">"##,
            x_min = bounds.min().x,
            x_max = bounds.max().x,
            y_min = bounds.min().y,
            y_max = bounds.max().y,
        )?;
        writeln!(self, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
        Ok(())
    }

    pub(crate) fn write_styles(&mut self) -> Result<()> {
        writeln!(self, r##"<defs>
<style>
    .zone {{ stroke: #111827; stroke-width: 0.5; fill-opacity: 0.55; }}
    .edge {{ stroke: #6b7280; stroke-opacity: 0.6; stroke-width: 1; }}
    .camera {{ fill: #dc2626; stroke: #ffffff; stroke-width: 0.75; }}
    .route {{ fill: none; stroke: #2563eb; stroke-opacity: 0.5; stroke-width: 2; }}
    .route.best {{ stroke: #16a34a; stroke-opacity: 1; stroke-width: 3; }}
</style>
</defs>"##)?;
        Ok(())
    }

    pub(crate) fn write_footer(&mut self) -> Result<()> {
        writeln!(self, "</svg>")?;
        Ok(())
    }
}
