//! Printable A4 invoice for a single order.
//!
//! [`InvoiceView`] turns an [`OrderRecord`] into the exact strings printed on
//! the page, with placeholders for anything missing. [`render_invoice`] lays
//! the view out and serializes it. Rendering never fails because of record
//! data and always produces the same bytes for the same order.

mod barcode;
mod canvas;

use std::path::{Path, PathBuf};

use chrono::Datelike;
use kaushalya_core::{format_rupees, OrderRecord};

use crate::error::DocsError;
use canvas::{Align, Font, Page, Rgb, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

const PLACEHOLDER: &str = "N/A";

const BRAND: Rgb = Rgb(140, 60, 78);
const PANEL: Rgb = Rgb(253, 230, 225);
const STRIPE: Rgb = Rgb(253, 246, 245);
const RULE: Rgb = Rgb(200, 200, 200);
const FOOTER_FILL: Rgb = Rgb(245, 245, 245);
const FOOTER_TEXT: Rgb = Rgb(100, 100, 100);

const MARGIN_X: f32 = 14.0;
const FOOTER_TOP: f32 = 270.0;

const TABLE_TOP: f32 = 105.0;
/// Where tables resume on continuation pages.
const CONTINUED_TOP: f32 = 15.0;
/// Rows may not extend past this line; the footer band starts below it.
const TABLE_BOTTOM: f32 = 265.0;
const CELL_PADDING: f32 = 4.0;
const HEAD_FONT_PT: f32 = 10.0;
const BODY_FONT_PT: f32 = 9.0;
const HEADINGS: [&str; 5] = ["#", "Item Description", "Qty", "Unit Price", "Amount"];
const COLUMNS: [(f32, Align); 5] = [
    (10.0, Align::Center),
    (90.0, Align::Left),
    (20.0, Align::Center),
    (30.0, Align::Right),
    (32.0, Align::Right),
];

const SUMMARY_X: f32 = 125.0;
const SUMMARY_RIGHT: f32 = 196.0;
/// Vertical space the summary block needs below the table.
const SUMMARY_HEIGHT: f32 = 48.0;
/// Used when the table is empty.
const DEFAULT_TABLE_END: f32 = 120.0;

/// One printed row of the items table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLine {
    pub position: usize,
    pub description: String,
    pub quantity: u64,
    pub unit_price: String,
    pub amount: String,
}

impl InvoiceLine {
    fn cells(&self) -> [String; 5] {
        [
            self.position.to_string(),
            self.description.clone(),
            self.quantity.to_string(),
            self.unit_price.clone(),
            self.amount.clone(),
        ]
    }
}

/// Everything printed on an invoice, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceView {
    pub order_id: String,
    pub invoice_no: String,
    pub order_date: String,
    pub payment: String,
    pub status: String,
    pub ship_to_name: String,
    pub ship_to_phone: String,
    pub ship_to_address: String,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub total: String,
}

fn or_placeholder(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_owned()
}

impl InvoiceView {
    #[must_use]
    pub fn from_order(order: &OrderRecord) -> Self {
        let lines = order
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| InvoiceLine {
                position: index + 1,
                description: or_placeholder(item.name.as_deref()),
                quantity: item.effective_quantity(),
                unit_price: format_rupees(item.price),
                amount: format_rupees(item.total),
            })
            .collect();

        Self {
            order_id: order.order_id.clone(),
            invoice_no: or_placeholder(Some(&order.order_id)),
            order_date: order.created_on().map_or_else(
                || PLACEHOLDER.to_owned(),
                |d| format!("{}/{}/{}", d.day(), d.month(), d.year()),
            ),
            payment: or_placeholder(order.payment_method.as_deref()),
            status: or_placeholder(order.order_status.as_ref().map(ToString::to_string).as_deref()),
            ship_to_name: or_placeholder(order.customer_name().as_deref()),
            ship_to_phone: or_placeholder(order.phone.as_deref()),
            ship_to_address: or_placeholder(order.shipping_address().as_deref()),
            lines,
            subtotal: format_rupees(order.subtotal),
            tax: format_rupees(order.tax),
            shipping: format_rupees(order.shipping),
            total: format_rupees(order.total),
        }
    }
}

/// `Invoice_<orderId>.pdf`, with unsafe characters replaced.
#[must_use]
pub fn invoice_file_name(order_id: &str) -> String {
    format!("Invoice_{}.pdf", crate::sanitize_file_stem(order_id))
}

/// Renders `order` as PDF bytes.
///
/// # Errors
///
/// Returns [`DocsError::Pdf`] if the document cannot be serialized.
pub fn render_invoice(order: &OrderRecord) -> Result<Vec<u8>, DocsError> {
    let view = InvoiceView::from_order(order);
    let barcode = barcode::render(&view.order_id);
    let pages = layout(&view, barcode.is_some());
    tracing::debug!(order_id = %view.order_id, pages = pages.len(), lines = view.lines.len(), "invoice laid out");
    canvas::assemble(pages, barcode.as_ref())
}

/// Renders `order` into `dir` and returns the written path.
///
/// # Errors
///
/// Same as [`render_invoice`], plus [`DocsError::Io`] on write failure.
pub fn write_invoice(order: &OrderRecord, dir: &Path) -> Result<PathBuf, DocsError> {
    let bytes = render_invoice(order)?;
    crate::save_bytes(dir, &invoice_file_name(&order.order_id), &bytes)
}

fn layout(view: &InvoiceView, with_barcode: bool) -> Vec<Page> {
    let mut first = Page::default();
    draw_header(&mut first, view, with_barcode);

    let mut pages = Vec::new();
    let (mut page, table_end) = draw_items(first, &view.lines, &mut pages);

    let mut summary_top = table_end.unwrap_or(DEFAULT_TABLE_END);
    if summary_top + SUMMARY_HEIGHT > FOOTER_TOP {
        pages.push(page);
        page = Page::default();
        summary_top = CONTINUED_TOP;
    }
    draw_summary(&mut page, view, summary_top);
    pages.push(page);

    for page in &mut pages {
        draw_footer(page);
    }
    pages
}

fn draw_header(page: &mut Page, view: &InvoiceView, with_barcode: bool) {
    page.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, 35.0, BRAND);
    page.text(MARGIN_X, 15.0, "KAUSHALYA ART", Font::Bold, 24.0, Rgb::WHITE, Align::Left);
    page.text(MARGIN_X, 22.0, "Premium Artworks & Crafts", Font::Regular, 10.0, Rgb::WHITE, Align::Left);
    page.text(
        MARGIN_X,
        28.0,
        "www.kaushalyaart.com | contact@kaushalyaart.com",
        Font::Regular,
        10.0,
        Rgb::WHITE,
        Align::Left,
    );

    page.text(MARGIN_X, 48.0, "INVOICE", Font::Bold, 20.0, Rgb::BLACK, Align::Left);
    if with_barcode {
        page.image(145.0, 40.0, 50.0, 15.0);
    }

    page.fill_rounded_rect(MARGIN_X, 60.0, 85.0, 35.0, 2.0, PANEL);
    page.text(18.0, 67.0, "INVOICE DETAILS", Font::Bold, 9.0, BRAND, Align::Left);
    let details = [
        format!("Invoice No: {}", view.invoice_no),
        format!("Order Date: {}", view.order_date),
        format!("Payment: {}", view.payment),
        format!("Status: {}", view.status),
    ];
    for (line, y) in details.iter().zip([74.0, 80.0, 86.0, 92.0]) {
        page.text(18.0, y, line, Font::Regular, 9.0, Rgb::BLACK, Align::Left);
    }

    page.fill_rounded_rect(111.0, 60.0, 85.0, 35.0, 2.0, PANEL);
    page.text(115.0, 67.0, "SHIP TO", Font::Bold, 9.0, BRAND, Align::Left);
    page.text(115.0, 74.0, &view.ship_to_name, Font::Regular, 9.0, Rgb::BLACK, Align::Left);
    page.text(115.0, 80.0, &view.ship_to_phone, Font::Regular, 9.0, Rgb::BLACK, Align::Left);
    let mut y = 86.0;
    for line in canvas::wrap_text(&view.ship_to_address, 70.0, Font::Regular, 9.0) {
        page.text(115.0, y, &line, Font::Regular, 9.0, Rgb::BLACK, Align::Left);
        y += canvas::line_height_mm(9.0);
    }
}

/// Height of a row holding `lines` lines of `size_pt` text.
fn row_height(lines: usize, size_pt: f32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let lines = lines as f32;
    lines * canvas::line_height_mm(size_pt) + 2.0 * CELL_PADDING
}

/// Body lines a row can hold within `space` mm.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lines_fitting(space: f32) -> usize {
    let room = (space - 2.0 * CELL_PADDING) / canvas::line_height_mm(BODY_FONT_PT);
    if room < 1.0 {
        0
    } else {
        room.floor() as usize
    }
}

fn tallest(wrapped: &[Vec<String>]) -> usize {
    wrapped.iter().map(Vec::len).max().unwrap_or(1)
}

/// Wrapped cell text for one table row and the row's height.
fn measure_row(cells: &[String; 5], font: Font, size_pt: f32) -> (Vec<Vec<String>>, f32) {
    let wrapped: Vec<Vec<String>> = cells
        .iter()
        .zip(COLUMNS)
        .map(|(text, (width, _))| canvas::wrap_text(text, width - 2.0 * CELL_PADDING, font, size_pt))
        .collect();
    let height = row_height(tallest(&wrapped), size_pt);
    (wrapped, height)
}

struct RowStyle {
    font: Font,
    size_pt: f32,
    text: Rgb,
    fill: Option<Rgb>,
    /// Header cells ignore the per-column alignment.
    left_aligned: bool,
}

fn draw_row(page: &mut Page, top: f32, wrapped: &[Vec<String>], height: f32, style: &RowStyle) {
    let table_width: f32 = COLUMNS.iter().map(|(w, _)| w).sum();
    if let Some(fill) = style.fill {
        page.fill_rect(MARGIN_X, top, table_width, height, fill);
    }

    let first_baseline = top + CELL_PADDING + canvas::cap_height_mm(style.size_pt);
    let step = canvas::line_height_mm(style.size_pt);
    let mut left = MARGIN_X;
    for (lines, (width, align)) in wrapped.iter().zip(COLUMNS) {
        let align = if style.left_aligned { Align::Left } else { align };
        let x = match align {
            Align::Left => left + CELL_PADDING,
            Align::Center => left + width / 2.0,
            Align::Right => left + width - CELL_PADDING,
        };
        let mut baseline = first_baseline;
        for line in lines {
            page.text(x, baseline, line, style.font, style.size_pt, style.text, align);
            baseline += step;
        }
        left += width;
    }
}

fn draw_table_head(page: &mut Page, top: f32) -> f32 {
    let cells = HEADINGS.map(str::to_owned);
    let (wrapped, height) = measure_row(&cells, Font::Bold, HEAD_FONT_PT);
    let style = RowStyle {
        font: Font::Bold,
        size_pt: HEAD_FONT_PT,
        text: Rgb::WHITE,
        fill: Some(BRAND),
        left_aligned: true,
    };
    draw_row(page, top, &wrapped, height, &style);
    top + height
}

/// Draws the items table starting on `page`, pushing every page it fills
/// into `finished`. Returns the page the table ends on and the table's
/// bottom edge, or `None` for the bottom edge when there are no items.
///
/// A row that does not fit moves to the next page. A row taller than a
/// whole page is split across pages line by line.
fn draw_items(mut page: Page, lines: &[InvoiceLine], finished: &mut Vec<Page>) -> (Page, Option<f32>) {
    let mut y = draw_table_head(&mut page, TABLE_TOP);
    if lines.is_empty() {
        return (page, None);
    }

    let head_height = y - TABLE_TOP;
    let page_capacity = lines_fitting(TABLE_BOTTOM - CONTINUED_TOP - head_height);
    for (index, line) in lines.iter().enumerate() {
        let style = RowStyle {
            font: Font::Regular,
            size_pt: BODY_FONT_PT,
            text: Rgb::BLACK,
            fill: (index % 2 == 0).then_some(STRIPE),
            left_aligned: false,
        };
        let (mut wrapped, _) = measure_row(&line.cells(), Font::Regular, BODY_FONT_PT);
        loop {
            let needed = tallest(&wrapped);
            let available = lines_fitting(TABLE_BOTTOM - y);
            if needed <= available {
                let height = row_height(needed, BODY_FONT_PT);
                draw_row(&mut page, y, &wrapped, height, &style);
                y += height;
                break;
            }
            if available > 0 && needed > page_capacity {
                let rest = wrapped
                    .iter_mut()
                    .map(|cell| cell.split_off(available.min(cell.len())))
                    .collect();
                draw_row(&mut page, y, &wrapped, row_height(available, BODY_FONT_PT), &style);
                wrapped = rest;
            }
            finished.push(std::mem::take(&mut page));
            y = draw_table_head(&mut page, CONTINUED_TOP);
        }
    }
    (page, Some(y))
}

fn draw_summary(page: &mut Page, view: &InvoiceView, top: f32) {
    page.line(SUMMARY_X - 5.0, top + 10.0, SUMMARY_RIGHT, top + 10.0, RULE);
    let rows = [
        ("Subtotal:", &view.subtotal, 18.0),
        ("Tax (GST):", &view.tax, 25.0),
        ("Shipping:", &view.shipping, 32.0),
    ];
    for (label, value, offset) in rows {
        page.text(SUMMARY_X, top + offset, label, Font::Regular, 10.0, Rgb::BLACK, Align::Left);
        page.text(SUMMARY_RIGHT, top + offset, value, Font::Regular, 10.0, Rgb::BLACK, Align::Right);
    }
    page.line(SUMMARY_X - 5.0, top + 36.0, SUMMARY_RIGHT, top + 36.0, RULE);
    page.text(SUMMARY_X, top + 45.0, "Total:", Font::Bold, 12.0, BRAND, Align::Left);
    page.text(SUMMARY_RIGHT, top + 45.0, &view.total, Font::Bold, 12.0, BRAND, Align::Right);
}

fn draw_footer(page: &mut Page) {
    let center = PAGE_WIDTH_MM / 2.0;
    page.fill_rect(0.0, FOOTER_TOP, PAGE_WIDTH_MM, PAGE_HEIGHT_MM - FOOTER_TOP, FOOTER_FILL);
    page.text(center, 278.0, "Thank you for your business!", Font::Regular, 8.0, FOOTER_TEXT, Align::Center);
    page.text(
        center,
        284.0,
        "For any queries, please contact us at support@kaushalyaart.com",
        Font::Regular,
        8.0,
        FOOTER_TEXT,
        Align::Center,
    );
    page.text(
        center,
        291.0,
        "This is a computer-generated invoice and does not require a signature.",
        Font::Regular,
        7.0,
        FOOTER_TEXT,
        Align::Center,
    );
}

#[cfg(test)]
#[path = "invoice_test.rs"]
mod tests;
