//! Roll every die type under each mode and print the results.
//!
//! Run with: `cargo run -p swordsaga-core --example test_dice`

use swordsaga_core::dice::dice_display;
use swordsaga_core::tension::escalate_with_tension;
use swordsaga_core::{
    roll_dice_set, roll_dice_tags, DieType, DifficultyLevel, RollMode, RollSource, RollSummary,
};

fn main() {
    println!("=== Testing Dice Rolling ===\n");

    for mode in [RollMode::Normal, RollMode::Advantage, RollMode::Disadvantage] {
        test_roll(&DieType::ALL, mode, "every die");
    }

    for level in DifficultyLevel::ALL {
        test_roll(level.dice(), RollMode::Normal, level.name());
    }

    print!("Rolling tags d20, d4, d6 with tension... ");
    match roll_dice_tags(&["d20", "d4", "d6"], RollMode::Normal) {
        Ok(results) => {
            let summary = RollSummary::new("Tags", RollSource::Custom, RollMode::Normal, results);
            let escalated = escalate_with_tension(summary);
            println!("{} => {}", escalated.breakdown(), escalated.final_total);
        }
        Err(e) => println!("PARSE ERROR: {e}"),
    }

    print!("Rolling invalid tag d7... ");
    match roll_dice_tags(&["d7"], RollMode::Normal) {
        Ok(results) => println!("unexpected: {}", dice_display(&results)),
        Err(e) => println!("rejected: {e}"),
    }

    println!("\n=== All dice tests passed! ===");
}

fn test_roll(dice: &[DieType], mode: RollMode, description: &str) {
    print!("Rolling {description} ({mode})... ");
    let results = roll_dice_set(dice, mode);
    let summary = RollSummary::new(description, RollSource::Custom, mode, results);
    println!("{} [{}]", summary.breakdown(), dice_display(&summary.dice));
}
