//! Receipt PDF rendering
//!
//! Draws a one-page A4 receipt for a wash job with `printpdf`. Layout is a
//! fixed sequence of blocks top to bottom: header banner, customer and
//! vehicle, service details, financial summary, before/after photos and the
//! thank-you footer. Coordinates are millimetres from the bottom-left corner.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use printpdf::path::PaintMode;
use printpdf::{
    image_crate, BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm,
    PdfDocument, PdfLayerReference, Rect, Rgb,
};
use rust_decimal::Decimal;

use crate::config::ReceiptSettings;
use crate::domain::services::PricingService;
use crate::domain::WashJobView;
use crate::shared::error::AppError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 17.6;
const RIGHT_EDGE: f32 = PAGE_WIDTH - MARGIN;
const IMAGE_DPI: f32 = 300.0;
const PHOTO_PLACEHOLDER: &str = "Registro não disponível";
const MAX_PRODUCTS_CHARS: usize = 95;

/// Errors raised while producing a receipt.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    #[error("PDF rendering failed: {0}")]
    Render(String),
}

impl From<ReceiptError> for AppError {
    fn from(err: ReceiptError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Everything printed on a receipt, resolved ahead of drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptData {
    pub job_id: i64,
    pub issued_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    pub vehicle: String,
    pub plate: String,
    pub service_name: String,
    pub products_used: String,
    pub duration: String,
    pub base_value: Decimal,
    pub adjustment: Decimal,
    pub total_paid: Decimal,
    pub before_photo: Option<PathBuf>,
    pub after_photo: Option<PathBuf>,
}

impl ReceiptData {
    /// Build receipt data from a job view. `resolve` maps recorded photo
    /// paths to files on disk.
    pub fn from_view<F>(
        view: &WashJobView,
        settings: &ReceiptSettings,
        issued_at: DateTime<Utc>,
        resolve: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let job = &view.job;
        let products_used = job
            .products_used
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .unwrap_or_else(|| settings.default_products_text.clone());

        Self {
            job_id: job.id,
            issued_at,
            customer_name: view.customer_name.clone(),
            customer_phone: view.customer_phone.clone(),
            vehicle: format!("{} ({})", view.model, view.brand),
            plate: view.plate.clone(),
            service_name: view
                .service_name
                .clone()
                .unwrap_or_else(|| settings.default_service_label.clone()),
            products_used,
            duration: job.duration.clone().unwrap_or_else(|| "00:00".to_string()),
            base_value: job.total_amount - job.adjustment,
            adjustment: job.adjustment,
            total_paid: job.total_amount,
            before_photo: job
                .intake_photo_paths()
                .before_photo()
                .and_then(|p| resolve(&p)),
            after_photo: job.outcome_photo.as_deref().and_then(|p| resolve(p)),
        }
    }
}

/// "Nº 0042"-style receipt number.
pub fn receipt_number(job_id: i64) -> String {
    format!("{:04}", job_id)
}

/// Money with the currency symbol and two decimals.
pub fn format_money(symbol: &str, amount: Decimal) -> String {
    format!("{} {:.2}", symbol, PricingService::round_money(amount))
}

/// Approximate Helvetica text width in millimetres.
fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5 * 0.3528
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

struct Palette;

impl Palette {
    fn dark() -> Color {
        rgb(0x1A, 0x05, 0x2D)
    }
    fn accent() -> Color {
        rgb(0x6A, 0x1B, 0x9A)
    }
    fn gold() -> Color {
        rgb(0xD4, 0xAF, 0x37)
    }
    fn text() -> Color {
        rgb(0x33, 0x33, 0x33)
    }
    fn muted() -> Color {
        rgb(0x80, 0x80, 0x80)
    }
    fn panel() -> Color {
        rgb(0xF9, 0xF9, 0xF9)
    }
    fn placeholder() -> Color {
        rgb(0xE0, 0xE0, 0xE0)
    }
    fn white() -> Color {
        rgb(0xFF, 0xFF, 0xFF)
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

/// Page drawing helpers bound to one layer.
struct Canvas<'a> {
    layer: PdfLayerReference,
    fonts: &'a Fonts,
}

impl Canvas<'_> {
    fn fill_rect(&self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        self.layer.set_fill_color(color);
        self.layer
            .add_rect(Rect::new(Mm(x1), Mm(y1), Mm(x2), Mm(y2)).with_mode(PaintMode::Fill));
    }

    fn rule(&self, y: f32, color: Color) {
        self.fill_rect(MARGIN, y - 0.2, RIGHT_EDGE, y + 0.2, color);
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, font: &IndirectFontRef, color: Color) {
        self.layer.set_fill_color(color);
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    fn text_right(&self, text: &str, size: f32, right: f32, y: f32, font: &IndirectFontRef, color: Color) {
        self.text(text, size, right - text_width(text, size), y, font, color);
    }

    fn text_center(&self, text: &str, size: f32, y: f32, font: &IndirectFontRef, color: Color) {
        let x = (PAGE_WIDTH - text_width(text, size)) / 2.0;
        self.text(text, size, x.max(0.0), y, font, color);
    }

    fn section_title(&self, title: &str, y: f32) {
        self.text(title, 12.0, MARGIN, y, &self.fonts.bold, Palette::accent());
        self.rule(y - 1.8, Palette::accent());
    }

    fn label_value(&self, label: &str, value: &str, x: f32, value_x: f32, y: f32) {
        self.text(label, 10.0, x, y, &self.fonts.bold, Palette::text());
        self.text(value, 10.0, value_x, y, &self.fonts.regular, Palette::text());
    }

    /// Draw the photo scaled into the frame, or a placeholder box.
    fn photo_frame(&self, photo: Option<&Path>, x: f32, y: f32, width: f32, height: f32) {
        let image = photo.and_then(|path| match image_crate::open(path) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Receipt photo could not be decoded");
                None
            }
        });

        let Some(image) = image else {
            self.fill_rect(x, y, x + width, y + height, Palette::placeholder());
            self.text_center_in(PHOTO_PLACEHOLDER, 9.0, x, width, y + height / 2.0);
            return;
        };

        // Alpha channels are not embedded reliably; flatten to RGB
        let image = image_crate::DynamicImage::ImageRgb8(image.to_rgb8());
        let natural_width = image.width() as f32 / IMAGE_DPI * 25.4;
        let natural_height = image.height() as f32 / IMAGE_DPI * 25.4;
        if natural_width <= 0.0 || natural_height <= 0.0 {
            self.fill_rect(x, y, x + width, y + height, Palette::placeholder());
            self.text_center_in(PHOTO_PLACEHOLDER, 9.0, x, width, y + height / 2.0);
            return;
        }

        let scale = (width / natural_width).min(height / natural_height);
        let drawn_width = natural_width * scale;
        let drawn_height = natural_height * scale;

        Image::from_dynamic_image(&image).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x + (width - drawn_width) / 2.0)),
                translate_y: Some(Mm(y + (height - drawn_height) / 2.0)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
    }

    fn text_center_in(&self, text: &str, size: f32, x: f32, width: f32, y: f32) {
        let left = x + (width - text_width(text, size)) / 2.0;
        self.text(text, size, left.max(x), y, &self.fonts.italic, Palette::muted());
    }
}

/// Renders receipts with the shop's branding.
#[derive(Debug, Clone)]
pub struct ReceiptRenderer {
    settings: ReceiptSettings,
}

impl ReceiptRenderer {
    pub fn new(settings: ReceiptSettings) -> Self {
        Self { settings }
    }

    /// Produce the PDF bytes for one receipt.
    pub fn render(&self, data: &ReceiptData) -> Result<Vec<u8>, ReceiptError> {
        let title = format!("Recibo {}", receipt_number(data.job_id));
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Recibo");

        let font = |builtin| {
            doc.add_builtin_font(builtin)
                .map_err(|e| ReceiptError::Render(format!("{:?}", e)))
        };
        let fonts = Fonts {
            regular: font(BuiltinFont::Helvetica)?,
            bold: font(BuiltinFont::HelveticaBold)?,
            italic: font(BuiltinFont::HelveticaOblique)?,
        };

        let canvas = Canvas {
            layer: doc.get_page(page).get_layer(layer),
            fonts: &fonts,
        };

        self.draw_header(&canvas, data);
        self.draw_parties(&canvas, data);
        let y = self.draw_service(&canvas, data);
        let y = self.draw_financials(&canvas, data, y);
        self.draw_photos(&canvas, data, y);
        self.draw_footer(&canvas);

        doc.save_to_bytes()
            .map_err(|e| ReceiptError::Render(format!("{:?}", e)))
    }

    fn draw_header(&self, canvas: &Canvas<'_>, data: &ReceiptData) {
        let fonts = canvas.fonts;
        canvas.fill_rect(0.0, PAGE_HEIGHT - 42.3, PAGE_WIDTH, PAGE_HEIGHT, Palette::dark());
        canvas.fill_rect(0.0, PAGE_HEIGHT - 1.8, PAGE_WIDTH, PAGE_HEIGHT, Palette::gold());

        canvas.text(&self.settings.business_name, 28.0, MARGIN, 275.8, &fonts.bold, Palette::white());
        canvas.text(&self.settings.tagline, 10.0, MARGIN, 268.8, &fonts.regular, Palette::white());

        let number = format!("RECIBO Nº {}", receipt_number(data.job_id));
        canvas.text_right(&number, 12.0, RIGHT_EDGE, 275.8, &fonts.bold, Palette::white());
        let issued = format!("Emissão: {}", data.issued_at.format("%d/%m/%Y %H:%M"));
        canvas.text_right(&issued, 9.0, RIGHT_EDGE, 268.8, &fonts.regular, Palette::white());
    }

    fn draw_parties(&self, canvas: &Canvas<'_>, data: &ReceiptData) {
        canvas.section_title("INFORMAÇÕES DO CLIENTE", 240.6);

        canvas.label_value("CLIENTE:", &data.customer_name, MARGIN, 37.0, 231.8);
        canvas.label_value("VEÍCULO:", &data.vehicle, 105.8, 125.2, 231.8);
        canvas.label_value("TELEFONE:", &data.customer_phone, MARGIN, 40.5, 226.5);
        canvas.label_value("PLACA:", &data.plate, 105.8, 123.4, 226.5);
    }

    /// Returns the baseline of the last line drawn.
    fn draw_service(&self, canvas: &Canvas<'_>, data: &ReceiptData) -> f32 {
        let fonts = canvas.fonts;
        canvas.section_title("DETALHES DO SERVIÇO REALIZADO", 212.4);

        canvas.label_value("SERVIÇO:", &data.service_name, MARGIN, 37.0, 203.6);
        canvas.label_value("DURAÇÃO:", &data.duration, 105.8, 126.0, 203.6);

        canvas.text("PRODUTOS UTILIZADOS:", 10.0, MARGIN, 196.5, &fonts.bold, Palette::text());
        let products = format!("- {}", truncate(&data.products_used, MAX_PRODUCTS_CHARS));
        canvas.text(&products, 9.0, 21.2, 191.2, &fonts.italic, Palette::text());
        191.2
    }

    /// Returns the bottom edge of the summary box.
    fn draw_financials(&self, canvas: &Canvas<'_>, data: &ReceiptData, top: f32) -> f32 {
        let fonts = canvas.fonts;
        let symbol = &self.settings.currency_symbol;
        let y = top - 17.6;
        let bottom = y - 28.2;
        let inner_right = RIGHT_EDGE - 7.0;

        canvas.fill_rect(MARGIN, bottom, RIGHT_EDGE, y + 3.5, Palette::panel());
        canvas.text("RESUMO FINANCEIRO", 11.0, MARGIN + 7.0, y - 5.3, &fonts.bold, Palette::text());

        canvas.text("Valor Base do Serviço:", 10.0, MARGIN + 7.0, y - 12.3, &fonts.regular, Palette::text());
        canvas.text_right(&format_money(symbol, data.base_value), 10.0, inner_right, y - 12.3, &fonts.regular, Palette::text());

        canvas.text("Taxas Adicionais / Descontos:", 10.0, MARGIN + 7.0, y - 17.6, &fonts.regular, Palette::text());
        canvas.text_right(&format_money(symbol, data.adjustment), 10.0, inner_right, y - 17.6, &fonts.regular, Palette::text());

        canvas.fill_rect(MARGIN + 7.0, y - 20.6, inner_right, y - 20.3, Palette::placeholder());

        canvas.text("VALOR TOTAL PAGO", 14.0, MARGIN + 7.0, y - 26.5, &fonts.bold, Palette::dark());
        canvas.text_right(&format_money(symbol, data.total_paid), 16.0, inner_right, y - 26.5, &fonts.bold, Palette::gold());

        bottom
    }

    fn draw_photos(&self, canvas: &Canvas<'_>, data: &ReceiptData, top: f32) {
        let fonts = canvas.fonts;
        let title_y = top - 9.0;
        canvas.section_title("REGISTRO FOTOGRÁFICO", title_y);

        let label_y = title_y - 7.0;
        let frame_top = label_y - 2.5;
        let frame_bottom = 47.0;
        let gap = 6.0;
        let frame_width = (RIGHT_EDGE - MARGIN - gap) / 2.0;
        let after_x = MARGIN + frame_width + gap;

        canvas.text("ANTES", 10.0, MARGIN, label_y, &fonts.bold, Palette::text());
        canvas.text("DEPOIS", 10.0, after_x, label_y, &fonts.bold, Palette::text());

        canvas.photo_frame(
            data.before_photo.as_deref(),
            MARGIN,
            frame_bottom,
            frame_width,
            frame_top - frame_bottom,
        );
        canvas.photo_frame(
            data.after_photo.as_deref(),
            after_x,
            frame_bottom,
            frame_width,
            frame_top - frame_bottom,
        );
    }

    fn draw_footer(&self, canvas: &Canvas<'_>) {
        let fonts = canvas.fonts;
        let mut y = 35.3;
        canvas.text_center(&self.settings.thank_you, 11.0, y, &fonts.bold, Palette::accent());
        for line in &self.settings.footer_lines {
            y -= 5.0;
            canvas.text_center(line, 9.0, y, &fonts.regular, Palette::muted());
        }
    }
}
