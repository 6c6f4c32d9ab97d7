//! Chart-ready series
//!
//! The adapter turns a derived tree into flat records for rendering. The
//! decision between real data and the built-in sample dataset is made in
//! exactly one place, [`ChartDataAdapter::has_valid_data`]; every series
//! built from sample data is tagged so the caller can label it as such.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use core_kernel::{format_amount, CategoryId, SubCategoryId};
use crate::engine::{DerivedCategory, DerivedSubCategory, DerivedTree};
use crate::tree::{MUTUAL_FUNDS_ID, STOCKS_ID};

/// Chart colours; records carry an index into this list
pub const PALETTE: [&str; 6] = [
    "#1E88E5", // blue
    "#00C853", // green
    "#FF4081", // pink
    "#FFC107", // amber
    "#7C4DFF", // deep purple
    "#00BCD4", // cyan
];

/// Total amount of the sample dataset
pub const SAMPLE_TOTAL_AMOUNT: Decimal = dec!(1000000);

/// Label used for sub-categories with a blank name
pub const UNNAMED_LABEL: &str = "Unnamed";

static SAMPLE_TREE: Lazy<DerivedTree> = Lazy::new(|| DerivedTree {
    total_amount: SAMPLE_TOTAL_AMOUNT,
    categories: vec![
        sample_category(MUTUAL_FUNDS_ID, "Mutual Funds", dec!(60), dec!(600000), &[
            ("Large Cap", dec!(40), dec!(240000)),
            ("Mid Cap", dec!(35), dec!(210000)),
            ("Small Cap", dec!(25), dec!(150000)),
        ]),
        sample_category(STOCKS_ID, "Stocks", dec!(40), dec!(400000), &[
            ("IT Sector", dec!(45), dec!(180000)),
            ("Banking", dec!(35), dec!(140000)),
            ("FMCG", dec!(20), dec!(80000)),
        ]),
    ],
});

fn sample_category(
    id: &str,
    name: &str,
    percentage: Decimal,
    amount: Decimal,
    subs: &[(&str, Decimal, Decimal)],
) -> DerivedCategory {
    DerivedCategory {
        id: CategoryId::from(id),
        name: name.to_string(),
        percentage,
        amount,
        sub_categories: subs
            .iter()
            .enumerate()
            .map(|(i, (sub_name, sub_percentage, sub_amount))| DerivedSubCategory {
                id: SubCategoryId::new(format!("sample-{}", i + 1)),
                name: sub_name.to_string(),
                percentage: *sub_percentage,
                amount: *sub_amount,
            })
            .collect(),
    }
}

/// The fixed sample dataset shown when there is no valid real allocation
pub fn sample_tree() -> &'static DerivedTree {
    &SAMPLE_TREE
}

/// One slice or bar of a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    pub name: String,
    pub percentage: Decimal,
    pub amount: Decimal,
    /// Index into [`PALETTE`]
    pub color_index: usize,
    /// Set when the record comes from the sample dataset
    pub is_sample: bool,
}

impl ChartRecord {
    /// The palette colour for this record
    pub fn color(&self) -> &'static str {
        PALETTE[self.color_index % PALETTE.len()]
    }

    /// The amount with Indian digit grouping
    pub fn formatted_amount(&self) -> String {
        format_amount(self.amount)
    }
}

/// An ordered list of chart records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub records: Vec<ChartRecord>,
    /// The amount the series divides up
    pub total_amount: Decimal,
    /// Set when the whole series comes from the sample dataset
    pub is_sample: bool,
}

impl ChartSeries {
    fn empty(total_amount: Decimal, is_sample: bool) -> Self {
        Self {
            records: Vec::new(),
            total_amount,
            is_sample,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// The total with Indian digit grouping
    pub fn formatted_total(&self) -> String {
        format_amount(self.total_amount)
    }

    /// Records ordered by descending percentage, for summary grids
    pub fn sorted_by_weight(&self) -> Vec<ChartRecord> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.percentage.cmp(&a.percentage));
        records
    }
}

/// Maps derived trees to chart series
#[derive(Debug, Clone, Copy)]
pub struct ChartDataAdapter {
    palette_size: usize,
}

impl Default for ChartDataAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartDataAdapter {
    pub fn new() -> Self {
        Self {
            palette_size: PALETTE.len(),
        }
    }

    /// Returns true if real data should be charted
    ///
    /// Requires a derived tree (so validation passed), a positive total, and
    /// at least one category with a positive percentage.
    pub fn has_valid_data(&self, derived: Option<&DerivedTree>) -> bool {
        derived.map_or(false, |tree| {
            tree.total_amount > Decimal::ZERO && tree.has_positive_category()
        })
    }

    fn color_index(&self, position: usize) -> usize {
        position % self.palette_size
    }

    /// One record per category, in category order
    pub fn main_series(&self, derived: Option<&DerivedTree>) -> ChartSeries {
        let (tree, is_sample) = self.source(derived);

        ChartSeries {
            records: tree
                .categories
                .iter()
                .enumerate()
                .map(|(position, category)| ChartRecord {
                    name: category.name.clone(),
                    percentage: category.percentage,
                    amount: category.amount,
                    color_index: self.color_index(position),
                    is_sample,
                })
                .collect(),
            total_amount: tree.total_amount,
            is_sample,
        }
    }

    /// Sub-category records for one category, coloured with the category's colour
    ///
    /// Zero-weight sub-categories are left out. A real category with no
    /// sub-categories falls back to the sample sub-categories of the sample
    /// category with the same name, if there is one.
    pub fn sub_series(&self, derived: Option<&DerivedTree>, category_id: &CategoryId) -> ChartSeries {
        let (tree, is_sample) = self.source(derived);

        let Some(position) = tree.categories.iter().position(|c| &c.id == category_id) else {
            return ChartSeries::empty(Decimal::ZERO, is_sample);
        };
        let category = &tree.categories[position];
        let color_index = self.color_index(position);

        if !is_sample && category.sub_categories.is_empty() {
            return match sample_tree().categories.iter().find(|c| c.name == category.name) {
                Some(sample) => self.sub_records(sample, color_index, true),
                None => ChartSeries::empty(category.amount, false),
            };
        }

        self.sub_records(category, color_index, is_sample)
    }

    fn sub_records(&self, category: &DerivedCategory, color_index: usize, is_sample: bool) -> ChartSeries {
        ChartSeries {
            records: category
                .sub_categories
                .iter()
                .filter(|sub| sub.percentage > Decimal::ZERO)
                .map(|sub| ChartRecord {
                    name: if sub.name.trim().is_empty() {
                        UNNAMED_LABEL.to_string()
                    } else {
                        sub.name.clone()
                    },
                    percentage: sub.percentage,
                    amount: sub.amount,
                    color_index,
                    is_sample,
                })
                .collect(),
            total_amount: category.amount,
            is_sample,
        }
    }

    fn source<'a>(&self, derived: Option<&'a DerivedTree>) -> (&'a DerivedTree, bool) {
        match derived {
            Some(tree) if self.has_valid_data(Some(tree)) => (tree, false),
            _ => (sample_tree(), true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AllocationEngine;
    use crate::tree::{AllocationTree, Category, SubCategory};

    fn derived(tree: &AllocationTree) -> DerivedTree {
        AllocationEngine::new().derive(tree).unwrap()
    }

    #[test]
    fn test_no_data_falls_back_to_sample() {
        let adapter = ChartDataAdapter::new();
        let series = adapter.main_series(None);

        assert!(series.is_sample);
        assert_eq!(series.total_amount, SAMPLE_TOTAL_AMOUNT);
        assert_eq!(series.len(), 2);
        assert!(series.records.iter().all(|r| r.is_sample));
        assert_eq!(series.records[0].name, "Mutual Funds");
    }

    #[test]
    fn test_sample_sub_series() {
        let adapter = ChartDataAdapter::new();
        let series = adapter.sub_series(None, &CategoryId::from(STOCKS_ID));

        let names: Vec<_> = series.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["IT Sector", "Banking", "FMCG"]);
        assert!(series.records.iter().all(|r| r.color_index == 1 && r.is_sample));
    }

    #[test]
    fn test_real_series_cycles_palette() {
        let mut tree = AllocationTree::new();
        tree.set_total_amount("700");
        for i in 0..5 {
            tree.add_category(format!("c{}", i), format!("Cat {}", i)).unwrap();
        }
        for category in tree.categories.iter_mut() {
            category.percentage = "14.2857".into();
        }
        tree.categories[6].percentage = "14.2858".into();

        let series = ChartDataAdapter::new().main_series(Some(&derived(&tree)));
        assert!(!series.is_sample);
        assert_eq!(series.len(), 7);
        assert_eq!(series.records[5].color_index, 5);
        assert_eq!(series.records[6].color_index, 0);
    }

    #[test]
    fn test_zero_weight_subs_filtered_and_blank_names_labelled() {
        let tree = AllocationTree::from_parts(
            "1000",
            vec![Category::fixed(MUTUAL_FUNDS_ID, "Mutual Funds")
                .with_percentage("100")
                .with_sub_category(SubCategory::new("1", "", "100"))
                .with_sub_category(SubCategory::new("2", "Debt", "0"))],
        );

        let series = ChartDataAdapter::new().sub_series(Some(&derived(&tree)), &CategoryId::from(MUTUAL_FUNDS_ID));
        assert_eq!(series.len(), 1);
        assert_eq!(series.records[0].name, UNNAMED_LABEL);
        assert_eq!(series.records[0].amount, dec!(1000));
        assert!(!series.is_sample);
    }

    #[test]
    fn test_category_without_subs_uses_matching_sample() {
        let tree = AllocationTree::from_parts(
            "1000",
            vec![
                Category::fixed(MUTUAL_FUNDS_ID, "Mutual Funds").with_percentage("50"),
                Category::new("gold", "Gold").with_percentage("50"),
            ],
        );
        let derived = derived(&tree);
        let adapter = ChartDataAdapter::new();

        let mf = adapter.sub_series(Some(&derived), &CategoryId::from(MUTUAL_FUNDS_ID));
        assert!(mf.is_sample);
        assert_eq!(mf.len(), 3);

        let gold = adapter.sub_series(Some(&derived), &CategoryId::from("gold"));
        assert!(gold.is_empty());
        assert!(!gold.is_sample);
    }

    #[test]
    fn test_sorted_by_weight() {
        let series = ChartDataAdapter::new().sub_series(None, &CategoryId::from(STOCKS_ID));
        let mut shuffled = series.clone();
        shuffled.records.reverse();

        let sorted = shuffled.sorted_by_weight();
        assert_eq!(sorted[0].name, "IT Sector");
        assert_eq!(sorted[2].name, "FMCG");
    }

    #[test]
    fn test_formatted_amounts() {
        let series = ChartDataAdapter::new().main_series(None);
        assert_eq!(series.formatted_total(), "10,00,000");
        assert_eq!(series.records[0].formatted_amount(), "6,00,000");
        assert_eq!(series.records[1].color(), "#00C853");
    }
}
