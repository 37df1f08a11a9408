use std::collections::BTreeMap;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use recnorm_model::{FieldConfig, ModuleConfig};
use recnorm_normalization::sanitize_field;

pub fn print_sanitized(names: &[String]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Sanitized")]);
    apply_table_style(&mut table);
    for name in names {
        let sanitized = sanitize_field(name);
        let sanitized_cell = if sanitized == *name {
            dim_cell(&sanitized)
        } else {
            Cell::new(&sanitized).fg(Color::Green)
        };
        table.add_row(vec![Cell::new(name), sanitized_cell]);
    }
    println!("{table}");
}

pub fn print_module_configs(modules: &BTreeMap<String, ModuleConfig>) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Module"),
        header_cell("Field"),
        header_cell("Rename"),
        header_cell("Dtype"),
        header_cell("Include"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    let mut included = 0usize;
    let mut total = 0usize;
    for module in modules.values() {
        for field in module.fields.values() {
            total += 1;
            if field.include {
                included += 1;
            }
            table.add_row(vec![
                Cell::new(&module.module_name)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new(&field.source_name),
                rename_cell(field),
                Cell::new(field.dtype),
                include_cell(field.include),
            ]);
        }
    }
    println!("{table}");
    println!("Modules: {}", modules.len());
    println!("Fields: {total} ({included} included)");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn rename_cell(field: &FieldConfig) -> Cell {
    match &field.rename_target {
        Some(target) => Cell::new(target),
        None => dim_cell("-"),
    }
}

fn include_cell(include: bool) -> Cell {
    if include {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
