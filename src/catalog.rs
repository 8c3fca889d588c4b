/// A category of canned example questions shown on the welcome screen.
pub struct Section {
    pub title: &'static str,
    pub examples: &'static [&'static str],
}

const SECTIONS: &[Section] = &[
    Section {
        title: "Basic Queries",
        examples: &[
            "Show me all active customers",
            "List products with less than 10 items in stock",
            "What are the top 5 most expensive products?",
            "Show all orders placed in the last month",
        ],
    },
    Section {
        title: "Analytics & Insights",
        examples: &[
            "What's the total revenue from all completed orders?",
            "Which customer segment generates the most revenue?",
            "Show me the average order value by region",
            "What product categories have the highest profit margins?",
        ],
    },
    Section {
        title: "Customer Analysis",
        examples: &[
            "Who are our most valuable customers based on total purchase amount?",
            "Show me customers who joined in 2023 but haven't placed any orders",
            "List customers who have spent more than $1000",
            "What's the distribution of customers across different regions?",
        ],
    },
    Section {
        title: "Inventory Management",
        examples: &[
            "Which products are currently out of stock?",
            "Show me products with high stock levels but low sales",
            "What's the total inventory value at retail price?",
            "List products that need restocking (less than 5 units available)",
        ],
    },
    Section {
        title: "Sales Trends",
        examples: &[
            "Compare monthly sales between this year and last year",
            "What day of the week has the highest order volume?",
            "Show the trend of average order value over the past 6 months",
            "Which payment method is most popular among customers?",
        ],
    },
];

pub fn sections() -> &'static [Section] {
    SECTIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_has_examples() {
        assert!(!sections().is_empty());
        for section in sections() {
            assert!(!section.title.is_empty());
            assert!(!section.examples.is_empty());
            for example in section.examples {
                assert!(!example.trim().is_empty());
            }
        }
    }

    #[test]
    fn section_titles_are_unique() {
        let mut titles: Vec<_> = sections().iter().map(|s| s.title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), sections().len());
    }
}
