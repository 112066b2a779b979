use crate::gutenwind::classes::ClassList;
use crate::gutenwind::fragment::{
    TableCell, TableSection, TableSectionKind, attribute, extract_table_sections, split_figure,
};
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

/// Cell attributes carried over from the editor markup.
const CELL_ATTRIBUTES: &[&str] = &["colspan", "rowspan", "scope"];

pub struct Table;

impl Table {
    fn cell(&self, cell: &TableCell, props: &BlockProps<'_>) -> Element {
        let mut el = Element::new(&cell.tag);
        for name in CELL_ATTRIBUTES {
            if let Some(value) = attribute(&cell.attrs, name) {
                el = el.attr(name, value);
            }
        }
        let align = match attribute(&cell.attrs, "data-align").map(str::trim) {
            Some("left") => "text-left",
            Some("center") => "text-center",
            Some("right") => "text-right",
            _ => "",
        };
        el = el.classes(align);
        el.children(props.inline(&cell.content))
    }

    fn section(&self, section: &TableSection, props: &BlockProps<'_>) -> Option<Node> {
        if section.rows.is_empty() {
            return None;
        }
        let body = section.kind == TableSectionKind::Body;
        let rows = section.rows.iter().enumerate().map(|(index, cells)| {
            let mut row = Element::new("tr");
            if body {
                row = row
                    .id(Some(format!("row-{index}")))
                    .classes(if index % 2 == 0 { "even" } else { "odd" })
                    .attr("data-row-index", index.to_string());
            }
            row.children(cells.iter().map(|cell| self.cell(cell, props).into()))
                .into()
        });
        Some(Element::new(section.kind.tag()).children(rows).into())
    }
}

impl BlockRenderer for Table {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let (body, caption) = split_figure(&block.inner_html);

        let mut class = ClassList::from(format!("{}__table", props.block_class).as_str());
        if block.attr_bool("hasFixedLayout") {
            class.push("table-fixed");
        }
        class.extend(&props.classes);

        let sections = extract_table_sections(&body)
            .iter()
            .filter_map(|section| self.section(section, &props))
            .collect::<Vec<_>>();
        let table = Element::new("table").class(class).children(sections);

        let mut figure = Element::new("figure")
            .key(props.key.clone())
            .id(props.id.clone())
            .classes(&props.block_class)
            .child(table);
        if let Some(caption) = caption {
            figure = figure.child(Element::new("figcaption").children(props.inline(&caption)));
        }
        Some(figure.into())
    }
}
