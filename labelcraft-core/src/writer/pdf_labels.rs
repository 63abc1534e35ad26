//! One-page-per-asset PDF labels with a QR code

use super::RecordWriter;
use super::metrics::{LabelFont, truncate_chars, wrap_two_lines};
use super::payload::code_payload;
use crate::config::{LabelLayoutConfig, parse_hex_color};
use crate::record::AssetRecord;
use anyhow::{Context, Result, anyhow};
use image::{DynamicImage, Rgb as Pixel, RgbImage};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Rgb,
};
use qrcode::QrCode;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Modules of blank border around the QR symbol
const QR_QUIET_ZONE: usize = 4;

/// Positions on a label, in millimetres from the bottom-left corner.
///
/// Derived from the 57x32 mm layout and scaled down for smaller stock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelGeometry {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub margin: f32,
    pub band_height: f32,
    pub qr_size: f32,
    pub qr_x: f32,
    pub qr_y: f32,
    pub id_y: f32,
    pub text_width: f32,
}

impl LabelGeometry {
    pub fn for_size(width: f32, height: f32) -> Self {
        let scale = (height / 32.0).min(1.0);
        let margin = 2.0;
        let band_height = (height * 0.1875).max(4.0);
        let qr_size = (height - band_height - 10.0 * scale)
            .min(width * 0.45)
            .max(5.0);
        let qr_x = width - qr_size - margin;
        let id_y = 2.5 * scale;
        let qr_y = 6.0 * scale;

        Self {
            width,
            height,
            scale,
            margin,
            band_height,
            qr_size,
            qr_x,
            qr_y,
            id_y,
            text_width: (qr_x - 2.0 * margin).max(1.0),
        }
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

impl Fonts {
    fn get(&self, font: LabelFont) -> &IndirectFontRef {
        match font {
            LabelFont::Helvetica => &self.regular,
            LabelFont::HelveticaBold => &self.bold,
            LabelFont::Courier => &self.mono,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    accent: (f32, f32, f32),
    text: (f32, f32, f32),
    muted: (f32, f32, f32),
}

fn color((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn white() -> Color {
    color((1.0, 1.0, 1.0))
}

fn pdf_error(e: printpdf::Error) -> anyhow::Error {
    anyhow!("PDF error: {:?}", e)
}

/// Renders labels into a single in-memory document, saved once
pub struct LabelPdfWriter {
    layout: LabelLayoutConfig,
    geometry: LabelGeometry,
    palette: Palette,
    logo: Option<DynamicImage>,
}

impl LabelPdfWriter {
    pub fn new(layout: &LabelLayoutConfig) -> Result<Self> {
        let parse = |key: &str, value: &str| {
            parse_hex_color(value).ok_or_else(|| anyhow!("invalid {} '{}'", key, value))
        };
        let palette = Palette {
            accent: parse("accent_color", &layout.accent_color)?,
            text: parse("text_color", &layout.text_color)?,
            muted: parse("muted_color", &layout.muted_color)?,
        };
        let logo = layout
            .logo
            .as_deref()
            .and_then(|path| load_logo(path, palette.accent));

        Ok(Self {
            layout: layout.clone(),
            geometry: LabelGeometry::for_size(layout.width_mm, layout.height_mm),
            palette,
            logo,
        })
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    /// Build the document; one page per record
    pub fn render(&self, records: &[AssetRecord]) -> Result<PdfDocumentReference> {
        let g = &self.geometry;
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.layout.title, Mm(g.width), Mm(g.height), "Label");

        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(pdf_error)?,
            mono: doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_error)?,
        };

        for (i, record) in records.iter().enumerate() {
            let (page, layer) = if i == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(g.width), Mm(g.height), "Label")
            };
            let layer = doc.get_page(page).get_layer(layer);
            self.draw_label(&layer, &fonts, record)
                .with_context(|| format!("Failed to draw label for '{}'", record.id))?;
        }

        Ok(doc)
    }

    fn draw_label(
        &self,
        layer: &PdfLayerReference,
        fonts: &Fonts,
        record: &AssetRecord,
    ) -> Result<()> {
        let g = &self.geometry;
        let s = g.scale;

        // Header band
        layer.set_fill_color(color(self.palette.accent));
        fill_rect(layer, 0.0, g.height - g.band_height, g.width, g.height);

        let mut title_x = g.margin;
        if let Some(logo) = &self.logo {
            title_x += self.draw_logo(layer, logo) + 1.0;
        }

        let header_y = g.height - g.band_height + 1.5 * s;
        layer.set_fill_color(white());
        draw_text(
            layer,
            fonts,
            LabelFont::HelveticaBold,
            8.0 * s,
            title_x,
            header_y,
            &self.layout.title,
        );

        let branch = truncate_chars(&record.branch, 25);
        let branch_size = 5.0 * s;
        let branch_x =
            g.width - g.margin - LabelFont::Helvetica.text_width_mm(&branch, branch_size);
        draw_text(layer, fonts, LabelFont::Helvetica, branch_size, branch_x, header_y, &branch);

        // Description, up to two lines
        layer.set_fill_color(color(self.palette.text));
        let desc_size = 7.5 * s;
        let (line1, line2) =
            wrap_two_lines(&record.description, LabelFont::Helvetica, desc_size, g.text_width);
        let mut y = g.height - 10.0 * s;
        draw_text(layer, fonts, LabelFont::Helvetica, desc_size, g.margin, y, &line1);
        if !line2.is_empty() {
            y -= 3.0 * s;
            draw_text(
                layer,
                fonts,
                LabelFont::Helvetica,
                desc_size,
                g.margin,
                y,
                &truncate_chars(&line2, 28),
            );
        }

        // Brand / model
        y -= 4.5 * s;
        let brand_model = record
            .brand_model()
            .unwrap_or_else(|| self.layout.generic_text.clone());
        let size = LabelFont::HelveticaBold.fit_size(&brand_model, g.text_width, 7.0 * s, 4.0);
        layer.set_fill_color(color(self.palette.muted));
        draw_text(layer, fonts, LabelFont::HelveticaBold, size, g.margin, y, &brand_model);

        if !record.serial.is_empty() {
            y -= 3.5 * s;
            layer.set_fill_color(color(self.palette.text));
            draw_text(
                layer,
                fonts,
                LabelFont::Courier,
                6.5 * s,
                g.margin,
                y,
                &format!("SN: {}", record.serial),
            );
        }

        // QR code
        let payload = code_payload(record, &self.layout);
        layer.set_fill_color(color(self.palette.text));
        draw_qr(layer, &payload, g.qr_x, g.qr_y, g.qr_size)?;

        // Identifier centred under the code
        layer.set_fill_color(color(self.palette.accent));
        let id_size = LabelFont::HelveticaBold.fit_size(&record.id, g.qr_size + 2.0, 8.0 * s, 3.0);
        let id_width = LabelFont::HelveticaBold.text_width_mm(&record.id, id_size);
        let center_x = g.qr_x + g.qr_size / 2.0;
        draw_text(
            layer,
            fonts,
            LabelFont::HelveticaBold,
            id_size,
            center_x - id_width / 2.0,
            g.id_y,
            &record.id,
        );

        Ok(())
    }

    /// Draw the logo inside the header band; returns its width in mm
    fn draw_logo(&self, layer: &PdfLayerReference, logo: &DynamicImage) -> f32 {
        let g = &self.geometry;
        let target_height = g.band_height - 1.0;
        let (px_width, px_height) = (logo.width() as f32, logo.height() as f32);
        if px_height <= 0.0 || target_height <= 0.0 {
            return 0.0;
        }
        let dpi = px_height * 25.4 / target_height;

        Image::from_dynamic_image(logo).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(g.margin)),
                translate_y: Some(Mm(g.height - g.band_height + 0.5)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );

        px_width * 25.4 / dpi
    }
}

impl RecordWriter for LabelPdfWriter {
    fn kind(&self) -> &str {
        "pdf"
    }

    fn write(&self, records: &[AssetRecord], path: &Path) -> Result<usize> {
        let doc = self.render(records)?;
        let file = File::create(path)
            .with_context(|| format!("Failed to create PDF: {}", path.display()))?;
        doc.save(&mut BufWriter::new(file)).map_err(pdf_error)?;
        Ok(records.len())
    }
}

/// Load the optional logo, flattened over the band color.
///
/// A missing file is silent, a broken one is logged.
fn load_logo(path: &Path, background: (f32, f32, f32)) -> Option<DynamicImage> {
    if !path.exists() {
        tracing::debug!("logo {} not found, labels will have none", path.display());
        return None;
    }
    match image::open(path) {
        Ok(img) => Some(flatten_alpha(&img, background)),
        Err(e) => {
            tracing::warn!("logo {} could not be read: {}", path.display(), e);
            None
        }
    }
}

/// Blend every pixel over `background`; PDF images here carry no alpha
fn flatten_alpha(img: &DynamicImage, background: (f32, f32, f32)) -> DynamicImage {
    let rgba = img.to_rgba8();
    let (bg_r, bg_g, bg_b) = background;
    let bg = [bg_r * 255.0, bg_g * 255.0, bg_b * 255.0];

    let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8, bg: f32| (c as f32 * alpha + bg * (1.0 - alpha)).round() as u8;
        Pixel([blend(r, bg[0]), blend(g, bg[1]), blend(b, bg[2])])
    });

    DynamicImage::ImageRgb8(flat)
}

fn draw_text(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    font: LabelFont,
    size_pt: f32,
    x: f32,
    y: f32,
    text: &str,
) {
    if text.is_empty() {
        return;
    }
    layer.use_text(text, size_pt, Mm(x), Mm(y), fonts.get(font));
}

fn rect_ring(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<(Point, bool)> {
    vec![
        (Point::new(Mm(x0), Mm(y0)), false),
        (Point::new(Mm(x1), Mm(y0)), false),
        (Point::new(Mm(x1), Mm(y1)), false),
        (Point::new(Mm(x0), Mm(y1)), false),
    ]
}

fn fill_rect(layer: &PdfLayerReference, x0: f32, y0: f32, x1: f32, y1: f32) {
    layer.add_polygon(Polygon {
        rings: vec![rect_ring(x0, y0, x1, y1)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

/// Dark-module runs of a QR symbol as rectangles, row by row.
///
/// Each entry is `(row, first_col, end_col)` with `end_col` exclusive.
pub fn qr_runs(payload: &str) -> Result<(usize, Vec<(usize, usize, usize)>)> {
    let code = QrCode::new(payload.as_bytes()).context("payload does not fit in a QR code")?;
    let width = code.width();
    let colors = code.to_colors();

    let mut runs = Vec::new();
    for row in 0..width {
        let mut col = 0;
        while col < width {
            if colors[row * width + col] == qrcode::Color::Dark {
                let start = col;
                while col < width && colors[row * width + col] == qrcode::Color::Dark {
                    col += 1;
                }
                runs.push((row, start, col));
            } else {
                col += 1;
            }
        }
    }

    Ok((width, runs))
}

fn draw_qr(layer: &PdfLayerReference, payload: &str, x: f32, y: f32, size: f32) -> Result<()> {
    let (width, runs) = qr_runs(payload)?;
    let module = size / (width + 2 * QR_QUIET_ZONE) as f32;
    let top = y + size;

    let rings = runs
        .into_iter()
        .map(|(row, start, end)| {
            let y1 = top - (QR_QUIET_ZONE + row) as f32 * module;
            rect_ring(
                x + (QR_QUIET_ZONE + start) as f32 * module,
                y1 - module,
                x + (QR_QUIET_ZONE + end) as f32 * module,
                y1,
            )
        })
        .collect();

    layer.add_polygon(Polygon {
        rings,
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    Ok(())
}
