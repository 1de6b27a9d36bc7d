//! Stacks the cells of one category.

use crate::cell::CellPainter;
use crate::model::Group;
use navmatrix_core::{Category, Item, ItemFilters, ItemState, SubtechniqueVisibility};

/// Rows reserved for `category` when sizing the grid: every item plus the sub-items of expanded
/// items. Exclusions are not subtracted.
pub fn visible_row_count(
    category: &Category,
    filters: &ItemFilters,
    visibility: SubtechniqueVisibility,
) -> usize {
    let key = category.key();
    category.items.len()
        + category
            .items
            .iter()
            .filter(|item| filters.is_expanded(key, &item.id, visibility))
            .map(|item| category.sub_items_of(&item.id).len())
            .sum::<usize>()
}

/// Builds the `cells` group for `category` and returns it with the offset below the last cell.
///
/// Cells keep `cell_height` even when the column ends early; the remaining space stays blank.
pub fn build_column(
    painter: &CellPainter<'_>,
    category: &Category,
    cell_height: f64,
    cell_width: f64,
    filters: &ItemFilters,
    visibility: SubtechniqueVisibility,
) -> (Group, f64) {
    let key = category.key();
    let mut column = Group::new("cells");
    let mut offset = 0.0;
    for item in &category.items {
        let sub_items: &[Item] = match filters.resolve(key, &item.id, visibility) {
            ItemState::Hidden => continue,
            ItemState::Collapsed => &[],
            ItemState::Expanded => category.sub_items_of(&item.id),
        };
        let (cell, next) = painter.build(offset, item, cell_height, cell_width, sub_items, key);
        column.push(cell);
        offset = next;
    }
    (column, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::DisplayMode;
    use crate::text::DeterministicTextMeasurer;
    use navmatrix_core::{Gradient, ItemSet, ItemTable, Rgb, Scope};

    fn category() -> Category {
        Category::new("TA0001", "Initial Access")
            .with_item("T1", "Drive-by Compromise")
            .with_item("T2", "Phishing")
            .with_item("T3", "Valid Accounts")
            .with_sub_items(
                "T2",
                vec![Item::new("T2.001", "Attachment"), Item::new("T2.002", "Link")],
            )
    }

    fn with_painter<R>(f: impl FnOnce(&CellPainter<'_>) -> R) -> R {
        let m = DeterministicTextMeasurer::default();
        let scores = ItemTable::new();
        let colors: ItemTable<Rgb> = ItemTable::new();
        let gradient = Gradient::default();
        let painter = CellPainter {
            measurer: &m,
            font_family: None,
            gradient: &gradient,
            scores: &scores,
            colors: &colors,
            border_color: "#000",
            display: DisplayMode::default(),
        };
        f(&painter)
    }

    fn cell_offsets(column: &Group) -> Vec<f64> {
        column.groups("cell").map(|c| c.translate.1).collect()
    }

    #[test]
    fn exact_exclusion_leaves_two_cells() {
        let filters = ItemFilters {
            excluded: ItemSet::new().with(Scope::Category("initial-access".into()), "T2"),
            ..ItemFilters::default()
        };
        let (column, end) = with_painter(|p| {
            build_column(
                p,
                &category(),
                25.0,
                100.0,
                &filters,
                SubtechniqueVisibility::Expanded,
            )
        });
        assert_eq!(cell_offsets(&column), [0.0, 25.0]);
        assert_eq!(end, 50.0);
    }

    #[test]
    fn wildcard_exclusion_beats_expansion() {
        let filters = ItemFilters {
            excluded: ItemSet::new().with(Scope::Any, "T2"),
            expanded: ItemSet::new().with(Scope::Any, "T2"),
        };
        let (column, _) = with_painter(|p| {
            build_column(p, &category(), 10.0, 50.0, &filters, SubtechniqueVisibility::All)
        });
        let ids: Vec<&str> = column
            .groups("cell")
            .filter_map(|c| c.id.as_deref())
            .collect();
        assert_eq!(ids, ["T1", "T3"]);
    }

    #[test]
    fn expanded_items_push_later_cells_down() {
        let filters = ItemFilters {
            expanded: ItemSet::new().with(Scope::Category("initial-access".into()), "T2"),
            ..ItemFilters::default()
        };
        let (column, end) = with_painter(|p| {
            build_column(
                p,
                &category(),
                10.0,
                50.0,
                &filters,
                SubtechniqueVisibility::Expanded,
            )
        });
        assert_eq!(cell_offsets(&column), [0.0, 10.0, 40.0]);
        assert_eq!(end, 50.0);
        let phishing = column.groups("cell").nth(1).unwrap();
        assert_eq!(phishing.groups("subcell").count(), 2);
    }

    #[test]
    fn visibility_modes_change_the_reserved_rows() {
        let expanded = ItemFilters {
            excluded: ItemSet::new().with(Scope::Any, "T2"),
            expanded: ItemSet::new().with(Scope::Any, "T2"),
        };
        let c = category();
        assert_eq!(
            visible_row_count(&c, &expanded, SubtechniqueVisibility::Expanded),
            5
        );
        assert_eq!(
            visible_row_count(&c, &ItemFilters::default(), SubtechniqueVisibility::All),
            5
        );
        assert_eq!(
            visible_row_count(&c, &expanded, SubtechniqueVisibility::None),
            3
        );
    }
}
