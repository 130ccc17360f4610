use crate::blocks::{
    Align, CellProperty, CellRange, DocumentBlock, ParagraphStyle, Stroke, TableBlock, TableCell,
    TextBlock, TextRun, VAlign, Weight,
};
use crate::config::InvoiceConfig;
use crate::graphics::Color;
use crate::model::{Invoice, TaxRate};
use crate::money::{format_amount, DisplayTotals};

/// Item table columns: Description, HSN Code, Qty, Rate, Amount.
pub const ITEM_COLUMN_WIDTHS: [f64; 5] = [230.0, 70.0, 50.0, 70.0, 80.0];
/// Label/value columns of the tax summary and signature tables.
pub const SUMMARY_COLUMN_WIDTHS: [f64; 2] = [400.0, 100.0];

/// Index of the amount column in the item table.
pub const AMOUNT_COLUMN: usize = 4;

fn header_background() -> Color {
    Color::from_rgb8(0x00, 0x4d, 0x40)
}

fn total_background() -> Color {
    Color::from_rgb8(0xe0, 0xf2, 0xf1)
}

fn grand_total_background() -> Color {
    Color::from_rgb8(0xcc, 0xff, 0xee)
}

const OUTER_GRID: Stroke = Stroke {
    width: 0.5,
    color: Color::BLACK,
};

const INNER_GRID: Stroke = Stroke {
    width: 0.25,
    color: Color::GREY,
};

/// Lays an [`Invoice`] out as an ordered block sequence.
///
/// Composition cannot fail; every input that got through the calculator
/// produces a document.
pub struct DocumentComposer<'a> {
    config: &'a InvoiceConfig,
}

impl<'a> DocumentComposer<'a> {
    pub fn new(config: &'a InvoiceConfig) -> Self {
        DocumentComposer { config }
    }

    pub fn compose(&self, invoice: &Invoice) -> Vec<DocumentBlock> {
        let totals = DisplayTotals::from_invoice(invoice);
        let mut blocks = Vec::with_capacity(24);

        self.seller_header(&mut blocks);
        blocks.push(DocumentBlock::Spacer(18.0));

        self.invoice_details(invoice, &mut blocks);
        blocks.push(DocumentBlock::Spacer(12.0));

        blocks.push(DocumentBlock::Table(self.item_table(invoice, &totals)));
        blocks.push(DocumentBlock::Spacer(20.0));

        blocks.push(DocumentBlock::Table(self.tax_table(&totals)));
        blocks.push(DocumentBlock::Spacer(20.0));

        self.bank_details(&mut blocks);
        blocks.push(DocumentBlock::Spacer(20.0));

        self.declaration(&mut blocks);
        blocks.push(DocumentBlock::Spacer(40.0));

        blocks.push(DocumentBlock::Table(self.signature_table()));
        blocks.push(DocumentBlock::Spacer(30.0));

        blocks
    }

    fn seller_header(&self, out: &mut Vec<DocumentBlock>) {
        let seller = &self.config.seller;
        out.push(heading(vec![TextRun::bold(&seller.name)], ParagraphStyle::TITLE));
        out.push(paragraph(vec![TextRun::plain(&seller.address)]));
        out.push(paragraph(vec![TextRun::plain(format!(
            "GST: {}",
            seller.gst_number
        ))]));
    }

    fn invoice_details(&self, invoice: &Invoice, out: &mut Vec<DocumentBlock>) {
        out.push(heading(
            vec![
                TextRun::bold("Invoice No:"),
                TextRun::plain(format!(" {} | ", self.config.invoice_number)),
                TextRun::bold("Date:"),
                TextRun::plain(format!(" {}", invoice.date())),
            ],
            ParagraphStyle::SECTION,
        ));
        out.push(paragraph(vec![
            TextRun::bold("Invoice To:"),
            TextRun::plain(format!(" {}", invoice.buyer())),
        ]));
    }

    /// Header row, one row per item, then the pre-tax total row.
    fn item_table(&self, invoice: &Invoice, totals: &DisplayTotals) -> TableBlock {
        let currency = &self.config.currency;
        let mut table = TableBlock::new(ITEM_COLUMN_WIDTHS.to_vec());

        table.push_row(vec![
            TableCell::text("Description"),
            TableCell::text("HSN Code"),
            TableCell::text("Qty"),
            TableCell::text(format!("Rate ({})", currency)),
            TableCell::text(format!("Amount ({})", currency)),
        ]);
        for item in invoice.items() {
            table.push_row(vec![
                TableCell::paragraph(vec![TextRun::plain(item.description())]),
                TableCell::text(item.code()),
                TableCell::text(item.quantity().to_string()),
                TableCell::text(format_amount(item.rate())),
                TableCell::text(format_amount(item.amount())),
            ]);
        }
        table.push_row(vec![
            TableCell::paragraph(vec![TextRun::bold("Total (Excl. Tax)")]),
            TableCell::empty(),
            TableCell::empty(),
            TableCell::empty(),
            TableCell::text(format_amount(totals.subtotal)),
        ]);

        let header = CellRange::row(0);
        let total = CellRange::row(-1);
        table
            .push_rule(header, CellProperty::Background(header_background()))
            .push_rule(header, CellProperty::TextColor(Color::WHITE))
            .push_rule(header, CellProperty::Weight(Weight::Bold))
            .push_rule(header, CellProperty::Align(Align::Center))
            .push_rule(CellRange::new((1, 1), (-1, -2)), CellProperty::Align(Align::Center))
            .push_rule(CellRange::new((0, 1), (0, -2)), CellProperty::Align(Align::Left))
            .push_rule(total, CellProperty::Background(total_background()))
            .push_rule(total, CellProperty::Weight(Weight::Bold))
            .push_rule(
                CellRange::new((AMOUNT_COLUMN as i32, -1), (-1, -1)),
                CellProperty::Align(Align::Right),
            );
        grid_rules(&mut table);
        table
            .push_rule(CellRange::all(), CellProperty::VAlign(VAlign::Middle))
            .push_rule(CellRange::all(), CellProperty::InnerGrid(INNER_GRID));
        padding_rules(&mut table);
        table
    }

    /// Subtotal, each tax component, and the emphasized grand total.
    fn tax_table(&self, totals: &DisplayTotals) -> TableBlock {
        let money = |amount| format!("{} {}", self.config.currency, format_amount(amount));
        let mut table = TableBlock::new(SUMMARY_COLUMN_WIDTHS.to_vec());

        table.push_row(vec![
            TableCell::text("Sub Total (Excl. Tax):"),
            TableCell::text(money(totals.subtotal)),
        ]);
        for (rate, amount) in &totals.taxes {
            table.push_row(vec![
                TableCell::text(tax_label(rate)),
                TableCell::text(money(*amount)),
            ]);
        }
        table.push_row(vec![
            TableCell::text("GRAND TOTAL:"),
            TableCell::text(money(totals.grand_total)),
        ]);

        let grand = CellRange::row(-1);
        table
            .push_rule(CellRange::new((1, 0), (-1, -1)), CellProperty::Align(Align::Right))
            .push_rule(grand, CellProperty::Weight(Weight::Bold))
            .push_rule(grand, CellProperty::Background(grand_total_background()));
        grid_rules(&mut table);
        padding_rules(&mut table);
        table
    }

    fn bank_details(&self, out: &mut Vec<DocumentBlock>) {
        let bank = &self.config.bank;
        out.push(heading(vec![TextRun::bold("Bank Details:")], ParagraphStyle::SECTION));
        out.push(paragraph(vec![TextRun::plain(format!("Bank: {}", bank.name))]));
        out.push(paragraph(vec![TextRun::plain(format!(
            "A/c No: {} | IFSC: {}",
            bank.account_number, bank.ifsc
        ))]));
    }

    fn declaration(&self, out: &mut Vec<DocumentBlock>) {
        out.push(heading(vec![TextRun::bold("Declaration:")], ParagraphStyle::SECTION));
        out.push(paragraph(vec![TextRun::plain(&self.config.declaration)]));
    }

    fn signature_table(&self) -> TableBlock {
        let mut table = TableBlock::new(SUMMARY_COLUMN_WIDTHS.to_vec());
        table.push_row(vec![
            TableCell::empty(),
            TableCell::text(format!("For {}", self.config.seller.name)),
        ]);
        let signer = CellRange::new((1, 0), (1, 0));
        table
            .push_rule(signer, CellProperty::Align(Align::Right))
            .push_rule(signer, CellProperty::Weight(Weight::Bold));
        table
    }
}

/// "SGST (9%) @ Gujarat"
pub fn tax_label(rate: &TaxRate) -> String {
    format!("{} ({}%) @ {}", rate.name, rate.percent(), rate.jurisdiction)
}

fn heading(runs: Vec<TextRun>, style: ParagraphStyle) -> DocumentBlock {
    DocumentBlock::Heading(TextBlock::new(runs, style))
}

fn paragraph(runs: Vec<TextRun>) -> DocumentBlock {
    DocumentBlock::Paragraph(TextBlock::new(runs, ParagraphStyle::BODY))
}

fn grid_rules(table: &mut TableBlock) {
    table.push_rule(CellRange::all(), CellProperty::Grid(OUTER_GRID));
}

fn padding_rules(table: &mut TableBlock) {
    table
        .push_rule(CellRange::all(), CellProperty::LeftPadding(6.0))
        .push_rule(CellRange::all(), CellProperty::RightPadding(6.0));
}
