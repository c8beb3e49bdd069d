//! End-to-end scenarios.
//!
//! Every scenario is written once against [`TodoPage`] and runs unchanged on
//! any backend. A scenario starts from a fresh navigation, seeds what it
//! needs, acts, then asserts; the first unmet expectation fails it.

use crate::filter::Filter;
use crate::fixture::TodoFixture;
use crate::locator::selectors;
use crate::page::TodoPage;
use crate::query::{expect_local_storage_contains, expect_location_hash, expect_new_todo_input_focused};
use crate::result::ProbeResult;
use serde::Serialize;

/// Label used by the interaction scenarios
pub const SAMPLE_TODO: &str = "SAMPLE TODO";

/// Replacement label for edits
pub const EDITED_TODO: &str = "Test";

/// Labels the counter scenario adds one by one
pub const COUNTER_TODOS: [&str; 3] = ["One", "Two", "Three"];

/// Feature area a scenario belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioGroup {
    /// Creating todos
    NewTodo,
    /// The complete-all control
    CompleteAll,
    /// Toggling, editing and deleting single todos
    Interaction,
    /// Remaining-items counter
    Counter,
    /// Local storage
    Persistence,
    /// Footer filters and hash routes
    Filter,
    /// Clear-completed button
    ClearCompleted,
}

impl ScenarioGroup {
    /// Heading used in reports
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::NewTodo => "New todo",
            Self::CompleteAll => "Complete all",
            Self::Interaction => "Todo interaction",
            Self::Counter => "Counter",
            Self::Persistence => "Persistence",
            Self::Filter => "Filters",
            Self::ClearCompleted => "Clear completed",
        }
    }
}

impl std::fmt::Display for ScenarioGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// One end-to-end scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Adding a fixture label shows it
    AddsNewTodo,
    /// The first added label is the only rendered title
    FirstAddedIsOnlyListedTitle,
    /// Submitting a blank label renders no item
    BlankTodoIsNotListed,
    /// Submitting a blank label leaves the remaining-items counter at zero
    BlankTodoLeavesItemCountAtZero,
    /// The new-todo input keeps focus after submitting
    NewTodoInputKeepsFocus,
    /// Complete-all completes every item, a second click reactivates them
    ToggleAllCompletesThenReactivates,
    /// Complete-all with one item already completed completes the rest
    ToggleAllCompletesRemaining,
    /// The checkbox marks an item completed
    ToggleMarksCompleted,
    /// Enter commits an edit
    EditCommitsOnEnter,
    /// Escape discards an edit
    EditRevertsOnEscape,
    /// Editing a label to blank removes the item
    EditingToBlankRemovesTodo,
    /// The delete control removes an item
    DeleteRemovesTodo,
    /// Several items can be deleted in a row
    DeleteSeveralTodos,
    /// Counter text follows the item count and pluralizes
    CounterPluralizes,
    /// Every label is written to local storage
    PersistsInLocalStorage,
    /// Items show up in a new tab at the same origin
    PersistsAcrossTabs,
    /// The active filter hides completed items
    FilterActive,
    /// The completed filter hides active items
    FilterCompleted,
    /// The all filter shows everything again
    FilterAll,
    /// Clear-completed removes finished items only
    ClearCompletedRemovesFinishedTodos,
}

impl Scenario {
    /// Every scenario in suite order
    pub const ALL: [Self; 20] = [
        Self::AddsNewTodo,
        Self::FirstAddedIsOnlyListedTitle,
        Self::BlankTodoIsNotListed,
        Self::BlankTodoLeavesItemCountAtZero,
        Self::NewTodoInputKeepsFocus,
        Self::ToggleAllCompletesThenReactivates,
        Self::ToggleAllCompletesRemaining,
        Self::ToggleMarksCompleted,
        Self::EditCommitsOnEnter,
        Self::EditRevertsOnEscape,
        Self::EditingToBlankRemovesTodo,
        Self::DeleteRemovesTodo,
        Self::DeleteSeveralTodos,
        Self::CounterPluralizes,
        Self::PersistsInLocalStorage,
        Self::PersistsAcrossTabs,
        Self::FilterActive,
        Self::FilterCompleted,
        Self::FilterAll,
        Self::ClearCompletedRemovesFinishedTodos,
    ];

    /// Every scenario in suite order
    #[must_use]
    pub fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// Identifier used for filtering and reports
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddsNewTodo => "adds_new_todo",
            Self::FirstAddedIsOnlyListedTitle => "first_added_is_only_listed_title",
            Self::BlankTodoIsNotListed => "blank_todo_is_not_listed",
            Self::BlankTodoLeavesItemCountAtZero => "blank_todo_leaves_item_count_at_zero",
            Self::NewTodoInputKeepsFocus => "new_todo_input_keeps_focus",
            Self::ToggleAllCompletesThenReactivates => "toggle_all_completes_then_reactivates",
            Self::ToggleAllCompletesRemaining => "toggle_all_completes_remaining",
            Self::ToggleMarksCompleted => "toggle_marks_completed",
            Self::EditCommitsOnEnter => "edit_commits_on_enter",
            Self::EditRevertsOnEscape => "edit_reverts_on_escape",
            Self::EditingToBlankRemovesTodo => "editing_to_blank_removes_todo",
            Self::DeleteRemovesTodo => "delete_removes_todo",
            Self::DeleteSeveralTodos => "delete_several_todos",
            Self::CounterPluralizes => "counter_pluralizes",
            Self::PersistsInLocalStorage => "persists_in_local_storage",
            Self::PersistsAcrossTabs => "persists_across_tabs",
            Self::FilterActive => "filter_active",
            Self::FilterCompleted => "filter_completed",
            Self::FilterAll => "filter_all",
            Self::ClearCompletedRemovesFinishedTodos => "clear_completed_removes_finished_todos",
        }
    }

    /// Sentence describing the behaviour under test
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AddsNewTodo => "Allows addition of new todo items.",
            Self::FirstAddedIsOnlyListedTitle => "Lists the first added todo as the only title.",
            Self::BlankTodoIsNotListed => "Does not allow addition of blank todos.",
            Self::BlankTodoLeavesItemCountAtZero => "Shows zero items left after a blank todo.",
            Self::NewTodoInputKeepsFocus => "Keeps focus on the input after adding a todo.",
            Self::ToggleAllCompletesThenReactivates => {
                "Completes all open todos, then changes to active."
            }
            Self::ToggleAllCompletesRemaining => {
                "Selects all others if one or more todos are already selected."
            }
            Self::ToggleMarksCompleted => "Is marked complete when checkbox is selected.",
            Self::EditCommitsOnEnter => "Is editable by double-clicking on the todo.",
            Self::EditRevertsOnEscape => {
                "Reverts to the previous state if Escape is pressed while editing."
            }
            Self::EditingToBlankRemovesTodo => "Removes a todo whose text is edited to blank.",
            Self::DeleteRemovesTodo => "Removes a todo when its delete button is selected.",
            Self::DeleteSeveralTodos => "Removes several todos one after another.",
            Self::CounterPluralizes => "Shows correct number of todos and correct verbiage.",
            Self::PersistsInLocalStorage => "Persists todos in local storage.",
            Self::PersistsAcrossTabs => "Shows persisted todos in a new tab.",
            Self::FilterActive => "Filters active todos.",
            Self::FilterCompleted => "Filters completed todos.",
            Self::FilterAll => "Filters all todos.",
            Self::ClearCompletedRemovesFinishedTodos => "Clears completed todos.",
        }
    }

    /// Feature area
    #[must_use]
    pub const fn group(self) -> ScenarioGroup {
        match self {
            Self::AddsNewTodo
            | Self::FirstAddedIsOnlyListedTitle
            | Self::BlankTodoIsNotListed
            | Self::BlankTodoLeavesItemCountAtZero
            | Self::NewTodoInputKeepsFocus => ScenarioGroup::NewTodo,
            Self::ToggleAllCompletesThenReactivates | Self::ToggleAllCompletesRemaining => {
                ScenarioGroup::CompleteAll
            }
            Self::ToggleMarksCompleted
            | Self::EditCommitsOnEnter
            | Self::EditRevertsOnEscape
            | Self::EditingToBlankRemovesTodo
            | Self::DeleteRemovesTodo
            | Self::DeleteSeveralTodos => ScenarioGroup::Interaction,
            Self::CounterPluralizes => ScenarioGroup::Counter,
            Self::PersistsInLocalStorage | Self::PersistsAcrossTabs => ScenarioGroup::Persistence,
            Self::FilterActive | Self::FilterCompleted | Self::FilterAll => ScenarioGroup::Filter,
            Self::ClearCompletedRemovesFinishedTodos => ScenarioGroup::ClearCompleted,
        }
    }

    /// Look a scenario up by name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Whether the name or description contains `pattern` (case-insensitive)
    #[must_use]
    pub fn matches(self, pattern: &str) -> bool {
        let pattern = pattern.to_lowercase();
        self.name().contains(&pattern) || self.description().to_lowercase().contains(&pattern)
    }

    /// Run against `page`
    pub async fn run<P: TodoPage>(self, page: &mut P, fixture: &TodoFixture) -> ProbeResult<()> {
        page.visit().await?;
        match self {
            Self::AddsNewTodo => adds_new_todo(page, fixture).await,
            Self::FirstAddedIsOnlyListedTitle => first_added_is_only_listed_title(page, fixture).await,
            Self::BlankTodoIsNotListed => blank_todo_is_not_listed(page).await,
            Self::BlankTodoLeavesItemCountAtZero => blank_todo_leaves_item_count_at_zero(page).await,
            Self::NewTodoInputKeepsFocus => new_todo_input_keeps_focus(page, fixture).await,
            Self::ToggleAllCompletesThenReactivates => {
                toggle_all_completes_then_reactivates(page, fixture).await
            }
            Self::ToggleAllCompletesRemaining => toggle_all_completes_remaining(page, fixture).await,
            Self::ToggleMarksCompleted => toggle_marks_completed(page).await,
            Self::EditCommitsOnEnter => edit_commits_on_enter(page).await,
            Self::EditRevertsOnEscape => edit_reverts_on_escape(page).await,
            Self::EditingToBlankRemovesTodo => editing_to_blank_removes_todo(page).await,
            Self::DeleteRemovesTodo => delete_removes_todo(page).await,
            Self::DeleteSeveralTodos => delete_several_todos(page, fixture).await,
            Self::CounterPluralizes => counter_pluralizes(page).await,
            Self::PersistsInLocalStorage => persists_in_local_storage(page, fixture).await,
            Self::PersistsAcrossTabs => persists_across_tabs(page, fixture).await,
            Self::FilterActive => filter_active(page, fixture).await,
            Self::FilterCompleted => filter_completed(page, fixture).await,
            Self::FilterAll => filter_all(page, fixture).await,
            Self::ClearCompletedRemovesFinishedTodos => {
                clear_completed_removes_finished_todos(page, fixture).await
            }
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ARRANGE HELPERS
// =============================================================================

async fn seed<P: TodoPage>(page: &P, fixture: &TodoFixture) -> ProbeResult<()> {
    for label in fixture.iter() {
        page.add_todo(label).await?;
    }
    Ok(())
}

/// All fixture items, with the middle one completed
async fn seed_with_middle_completed<P: TodoPage>(page: &P, fixture: &TodoFixture) -> ProbeResult<()> {
    seed(page, fixture).await?;
    page.toggle_todo(&fixture[1]).await
}

// =============================================================================
// NEW TODO
// =============================================================================

async fn adds_new_todo<P: TodoPage>(page: &P, fixture: &TodoFixture) -> ProbeResult<()> {
    page.add_todo(&fixture[0]).await?;
    page.get_todo(&fixture[0]).should_be_visible().await?;
    Ok(())
}

async fn first_added_is_only_listed_title<P: TodoPage>(
    page: &P,
    fixture: &TodoFixture,
) -> ProbeResult<()> {
    page.add_todo(&fixture[0]).await?;
    page.get_visible_todos()
        .should_have_texts(&[&fixture[0]])
        .await?;
    Ok(())
}

async fn blank_todo_is_not_listed<P: TodoPage>(page: &P) -> ProbeResult<()> {
    page.add_todo("").await?;
    page.get_visible_todos().should_not_exist().await?;
    Ok(())
}

async fn blank_todo_leaves_item_count_at_zero<P: TodoPage>(page: &P) -> ProbeResult<()> {
    page.add_todo("").await?;
    page.get_items_count_container()
        .should_contain_text("0")
        .await?
        .should_contain_text("items left")
        .await?;
    Ok(())
}

async fn new_todo_input_keeps_focus<P: TodoPage>(page: &P, fixture: &TodoFixture) -> ProbeResult<()> {
    page.add_todo(&fixture[0]).await?;
    page.get_todo(&fixture[0]).should_exist().await?;
    expect_new_todo_input_focused(page).await
}

// =============================================================================
// COMPLETE ALL
// =============================================================================

async fn toggle_all_completes_then_reactivates<P: TodoPage>(
    page: &P,
    fixture: &TodoFixture,
) -> ProbeResult<()> {
    seed(page, fixture).await?;
    page.toggle_all_todos().await?;
    page.get_visible_todos().completed().should_have_count(3).await?;
    page.toggle_all_todos().await?;
    page.get_visible_todos().should_have_count(3).await?;
    page.get_visible_todos().completed().should_have_count(0).await?;
    Ok(())
}

async fn toggle_all_completes_remaining<P: TodoPage>(
    page: &P,
    fixture: &TodoFixture,
) -> ProbeResult<()> {
    seed_with_middle_completed(page, fixture).await?;
    page.toggle_all_todos().await?;
    page.get_visible_todos().completed().should_have_count(3).await?;
    page.get_todo(&fixture[1])
        .should_have_class(selectors::COMPLETED_CLASS)
        .await?;
    Ok(())
}

// =============================================================================
// INTERACTION
// =============================================================================

async fn toggle_marks_completed<P: TodoPage>(page: &P) -> ProbeResult<()> {
    page.add_todo(SAMPLE_TODO).await?;
    page.toggle_todo(SAMPLE_TODO).await?;
    page.get_todo(SAMPLE_TODO)
        .should_have_class(selectors::COMPLETED_CLASS)
        .await?;
    Ok(())
}

async fn edit_commits_on_enter<P: TodoPage>(page: &P) -> ProbeResult<()> {
    page.add_todo(SAMPLE_TODO).await?;
    page.edit_todo(SAMPLE_TODO, EDITED_TODO, false).await?;
    page.get_todo(SAMPLE_TODO).should_not_exist().await?;
    page.get_todo(EDITED_TODO).should_exist().await?;
    Ok(())
}

async fn edit_reverts_on_escape<P: TodoPage>(page: &P) -> ProbeResult<()> {
    page.add_todo(SAMPLE_TODO).await?;
    page.edit_todo(SAMPLE_TODO, EDITED_TODO, true).await?;
    page.get_todo(SAMPLE_TODO).should_exist().await?;
    page.get_todo(EDITED_TODO).should_not_exist().await?;
    Ok(())
}

async fn editing_to_blank_removes_todo<P: TodoPage>(page: &P) -> ProbeResult<()> {
    page.add_todo(SAMPLE_TODO).await?;
    page.edit_todo(SAMPLE_TODO, "", false).await?;
    page.get_todo(SAMPLE_TODO).should_not_exist().await?;
    page.get_visible_todos().should_have_count(0).await?;
    Ok(())
}

async fn delete_removes_todo<P: TodoPage>(page: &P) -> ProbeResult<()> {
    page.add_todo(SAMPLE_TODO).await?;
    page.delete_todo(SAMPLE_TODO).await?;
    page.get_todo(SAMPLE_TODO).should_not_exist().await?;
    Ok(())
}

async fn delete_several_todos<P: TodoPage>(page: &P, fixture: &TodoFixture) -> ProbeResult<()> {
    page.add_todo(&fixture[0]).await?;
    page.add_todo(&fixture[1]).await?;
    page.delete_todo(&fixture[0]).await?;
    page.delete_todo(&fixture[1]).await?;
    page.get_todo(&fixture[0]).should_not_exist().await?;
    page.get_todo(&fixture[1]).should_not_exist().await?;
    Ok(())
}

// =============================================================================
// COUNTER
// =============================================================================

async fn counter_pluralizes<P: TodoPage>(page: &P) -> ProbeResult<()> {
    let [one, two, three] = COUNTER_TODOS;

    page.add_todo(one).await?;
    page.get_items_count_container()
        .should_contain_text("1")
        .await?
        .should_contain_text("item left")
        .await?
        .should_not_contain_text("items left")
        .await?;

    page.add_todo(two).await?;
    page.get_items_count_container()
        .should_contain_text("2")
        .await?
        .should_contain_text("items left")
        .await?;

    page.add_todo(three).await?;
    page.get_items_count_container()
        .should_contain_text("3")
        .await?
        .should_contain_text("items left")
        .await?;
    Ok(())
}

// =============================================================================
// PERSISTENCE
// =============================================================================

async fn persists_in_local_storage<P: TodoPage>(page: &P, fixture: &TodoFixture) -> ProbeResult<()> {
    seed(page, fixture).await?;
    expect_local_storage_contains(page, page.storage_key(), &fixture.labels()).await
}

async fn persists_across_tabs<P: TodoPage>(page: &mut P, fixture: &TodoFixture) -> ProbeResult<()> {
    seed(page, fixture).await?;
    for label in fixture.iter() {
        page.get_todo(label).should_exist().await?;
    }
    page.open_new_tab().await?;
    page.visit().await?;
    for label in fixture.iter() {
        page.get_todo(label).should_exist().await?;
    }
    Ok(())
}

// =============================================================================
// FILTERS
// =============================================================================

async fn filter_active<P: TodoPage>(page: &P, fixture: &TodoFixture) -> ProbeResult<()> {
    seed_with_middle_completed(page, fixture).await?;
    page.filter_todos_by(Filter::Active).await?;
    page.get_todo(&fixture[0]).should_be_visible().await?;
    page.get_todo(&fixture[1]).should_not_exist().await?;
    page.get_todo(&fixture[2]).should_be_visible().await?;
    page.get_visible_todos().should_have_count(2).await?;
    expect_location_hash(page, Filter::Active.hash()).await
}

async fn filter_completed<P: TodoPage>(page: &P, fixture: &TodoFixture) -> ProbeResult<()> {
    seed_with_middle_completed(page, fixture).await?;
    expect_completed_only(page, fixture).await
}

async fn filter_all<P: TodoPage>(page: &P, fixture: &TodoFixture) -> ProbeResult<()> {
    seed_with_middle_completed(page, fixture).await?;
    expect_completed_only(page, fixture).await?;

    page.filter_todos_by(Filter::All).await?;
    for label in fixture.iter() {
        page.get_todo(label).should_be_visible().await?;
    }
    page.get_visible_todos().should_have_count(3).await?;
    expect_location_hash(page, Filter::All.hash()).await
}

async fn expect_completed_only<P: TodoPage>(page: &P, fixture: &TodoFixture) -> ProbeResult<()> {
    page.filter_todos_by(Filter::Completed).await?;
    page.get_todo(&fixture[0]).should_not_exist().await?;
    page.get_todo(&fixture[1]).should_be_visible().await?;
    page.get_todo(&fixture[2]).should_not_exist().await?;
    page.get_visible_todos().should_have_count(1).await?;
    expect_location_hash(page, Filter::Completed.hash()).await
}

// =============================================================================
// CLEAR COMPLETED
// =============================================================================

async fn clear_completed_removes_finished_todos<P: TodoPage>(
    page: &P,
    fixture: &TodoFixture,
) -> ProbeResult<()> {
    page.add_todo(&fixture[0]).await?;
    page.add_todo(&fixture[1]).await?;
    page.toggle_todo(&fixture[0]).await?;
    page.get_clear_completed_button().should_be_visible().await?;
    page.clear_completed().await?;
    page.get_todo(&fixture[0]).should_not_exist().await?;
    page.get_todo(&fixture[1]).should_exist().await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = Scenario::all().iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), Scenario::ALL.len());
    }

    #[test]
    fn test_from_name() {
        for scenario in Scenario::all() {
            assert_eq!(Scenario::from_name(scenario.name()), Some(*scenario));
        }
        assert_eq!(Scenario::from_name("nope"), None);
    }

    #[test]
    fn test_matches() {
        assert!(Scenario::FilterActive.matches("filter"));
        assert!(Scenario::FilterActive.matches("ACTIVE TODOS"));
        assert!(!Scenario::FilterActive.matches("counter"));
    }

    #[test]
    fn test_every_group_has_scenarios() {
        let groups: HashSet<_> = Scenario::all().iter().map(|s| s.group()).collect();
        assert_eq!(groups.len(), 7);
    }

    #[test]
    fn test_blank_todo_keeps_both_observation_points() {
        assert_eq!(Scenario::BlankTodoIsNotListed.group(), ScenarioGroup::NewTodo);
        assert_eq!(
            Scenario::BlankTodoLeavesItemCountAtZero.group(),
            ScenarioGroup::NewTodo
        );
    }

    #[test]
    fn test_serialize_as_name() {
        let json = serde_json::to_string(&Scenario::CounterPluralizes).unwrap();
        assert_eq!(json, "\"counter_pluralizes\"");
        let json = serde_json::to_string(&ScenarioGroup::ClearCompleted).unwrap();
        assert_eq!(json, "\"clear_completed\"");
    }
}
