//! Property tests for title uniqueness and ticket allocation.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use proptest::prelude::*;
use std::collections::HashSet;
use tabs_core::TabError;
use tabs_testing::properties::title_batch;
use tabs_testing::{create_command, test_service};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("test runtime")
}

proptest! {
    /// No two surviving tabs share a title, whatever sequence of creates ran.
    #[test]
    fn surviving_titles_are_unique(titles in title_batch()) {
        let (service, tabs, users) = test_service();
        let owner = users.insert("owner");

        runtime().block_on(async {
            for title in &titles {
                match service.create(create_command(owner, title, "x")).await {
                    Ok(_) | Err(TabError::Conflict(_)) => {}
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
        });

        let stored = tabs.tabs();
        let distinct: HashSet<_> = stored.iter().map(|tab| tab.title.clone()).collect();
        prop_assert_eq!(distinct.len(), stored.len());

        let expected: HashSet<_> = titles.iter().cloned().collect();
        prop_assert_eq!(distinct, expected);
    }

    /// Tickets strictly increase in creation order and start at 500.
    #[test]
    fn tickets_strictly_increase(titles in title_batch(), deletes in prop::collection::vec(any::<bool>(), 40)) {
        let (service, tabs, users) = test_service();
        let owner = users.insert("owner");

        let created = runtime().block_on(async {
            let mut created = Vec::new();
            for (index, title) in titles.iter().enumerate() {
                let unique = format!("{title}-{index}");
                let tab = service.create(create_command(owner, &unique, "x")).await.unwrap();
                if deletes[index] {
                    service.delete(tab.id).await.unwrap();
                }
                created.push(tab.ticket);
            }
            created
        });

        prop_assert_eq!(created[0].value(), 500);
        for pair in created.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        prop_assert!(tabs.len() <= created.len());
    }
}
