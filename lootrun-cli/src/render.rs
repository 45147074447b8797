//! Terminal rendering.
use colored::Colorize;
use std::io::{self, Write};

use lootrun_core::{
    Catalog, CatalogRecord, FocusPresets, LoadoutView, MissionOverflow, Ranked, RunRules,
};

/// One catalog entry as printed by `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub detail: String,
    /// Rank or overview marker for picked entries.
    pub marker: Option<String>,
}

pub fn heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "{}", title.bright_cyan().bold())?;
    writeln!(out, "{}", "=".repeat(title.chars().count()).cyan())
}

pub fn rows(out: &mut impl Write, title: &str, rows: &[Row]) -> io::Result<()> {
    heading(out, title)?;
    if rows.is_empty() {
        return writeln!(out, "{}", "No entries match the current filters.".dimmed());
    }
    for row in rows {
        let marker = row
            .marker
            .as_deref()
            .map_or_else(|| "   ".normal(), |m| format!("{m:>3}").green().bold());
        writeln!(
            out,
            "{marker} {} {} {}",
            row.name.bold(),
            format!("[{}]", row.tag).yellow(),
            format!("({})", row.id).dimmed()
        )?;
        if !row.detail.is_empty() {
            writeln!(out, "      {}", row.detail)?;
        }
    }
    writeln!(out, "{}", format!("{} shown", rows.len()).dimmed())
}

fn ranked<T: CatalogRecord>(
    out: &mut impl Write,
    title: &str,
    picks: &[Ranked<'_, T>],
) -> io::Result<()> {
    writeln!(out, "{}", title.bold())?;
    if picks.is_empty() {
        return writeln!(out, "   {}", "none".dimmed());
    }
    for pick in picks {
        writeln!(
            out,
            "  {} {}",
            format!("#{}", pick.rank).green(),
            pick.record.name()
        )?;
    }
    Ok(())
}

pub fn mission_warning(out: &mut impl Write, warning: &MissionOverflow) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!(
            "⚠ {} missions selected; a run only completes {}.",
            warning.selected, warning.limit
        )
        .yellow()
    )
}

pub fn loadout(out: &mut impl Write, view: &LoadoutView<'_>) -> io::Result<()> {
    heading(out, "🎒 Loadout")?;
    if view.is_empty() {
        writeln!(
            out,
            "{}",
            "Nothing picked yet. `lootrun focus --list` shows ready-made picks.".dimmed()
        )?;
    }
    ranked(out, "Boons", &view.boons)?;
    ranked(out, "Beacons", &view.beacons)?;
    ranked(out, "Missions", &view.missions)?;
    if let Some(warning) = &view.mission_warning {
        mission_warning(out, warning)?;
    }

    writeln!(out, "{}", "Stats overview".bold())?;
    if view.stats.is_empty() {
        writeln!(out, "   {}", "none".dimmed())?;
    }
    for stat in &view.stats {
        writeln!(out, "  • {}", stat.name)?;
    }

    writeln!(out, "{}", "Beacon combos".bold())?;
    if view.combos.is_empty() {
        writeln!(out, "   {}", "none".dimmed())?;
    }
    for (pos, (combo, beacons)) in view.combos.iter().enumerate() {
        let names: Vec<_> = beacons
            .iter()
            .map(|b| format!("{} {}", b.emoji, b.name))
            .collect();
        writeln!(
            out,
            "  {}. {} {} {}",
            pos + 1,
            combo.name.bold(),
            format!("({})", combo.id).dimmed(),
            names.join(" → ")
        )?;
    }
    Ok(())
}

/// Limits that bear on the current picks.
pub fn run_rules(
    out: &mut impl Write,
    rules: &RunRules,
    missions: usize,
    stacking_curses: bool,
) -> io::Result<()> {
    writeln!(out, "{}", "Run rules".bold())?;
    writeln!(
        out,
        "  Missions  {missions}/{} (offered until challenge {})",
        rules.max_missions, rules.mission_cutoff_challenge
    )?;
    writeln!(
        out,
        "  Trials    up to {} (offered from challenge {} to {})",
        rules.max_trials, rules.trial_start_challenge, rules.trial_cutoff_challenge
    )?;
    writeln!(
        out,
        "  Length    {} challenges, {} with a White Beacon",
        rules.base_challenges, rules.white_beacon_challenges
    )?;
    writeln!(
        out,
        "  Beacons   {} choices after each challenge",
        rules.default_beacon_choices
    )?;
    if stacking_curses {
        writeln!(
            out,
            "  {}",
            format!(
                "Curse stacking: aim for {} curses before relying on curse scaling.",
                rules.optimal_curse_count
            )
            .yellow()
        )?;
    }
    Ok(())
}

/// Milestones, reward chests and end reward sources shown under `list challenges`.
pub fn challenge_reference(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    let scaling = &catalog.challenge_scaling;
    if !scaling.description.is_empty() {
        writeln!(out, "{}", "Scaling".bold())?;
        writeln!(out, "  {}", scaling.description)?;
        if !scaling.exception.is_empty() {
            writeln!(out, "  {}", scaling.exception.yellow())?;
        }
    }

    writeln!(out, "{}", "Milestones".bold())?;
    for milestone in &catalog.challenge_milestones {
        writeln!(
            out,
            "  {} {}",
            format!("{:>4}", milestone.challenge).green(),
            milestone.event
        )?;
    }

    writeln!(out, "{}", "Reward chests".bold())?;
    for reward in &catalog.challenge_rewards {
        writeln!(
            out,
            "  {} {}",
            reward.name.bold(),
            format!("({})", reward.frequency).dimmed()
        )?;
    }

    let end = &catalog.end_rewards;
    for (label, source) in [
        ("Pulls", &end.pulls),
        ("Rerolls", &end.rerolls),
        ("Sacrifices", &end.sacrifices),
    ] {
        if source.sources.is_empty() {
            continue;
        }
        writeln!(out, "{} {}", label.bold(), source.sources.join("; ").dimmed())?;
    }
    Ok(())
}

/// Curse sources and strategies shown under `list curses`.
pub fn curse_reference(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    if !catalog.curse_sources.is_empty() {
        writeln!(out, "{}", "Sources".bold())?;
    }
    for source in &catalog.curse_sources {
        writeln!(
            out,
            "  {} {} {}",
            format!("+{}", source.curses_applied).red(),
            source.name,
            format!("({})", source.reward).dimmed()
        )?;
    }
    if !catalog.curse_strategies.is_empty() {
        writeln!(out, "{}", "Strategies".bold())?;
    }
    for strategy in &catalog.curse_strategies {
        writeln!(
            out,
            "  {} {} target {}",
            strategy.name.bold(),
            format!("({})", strategy.id).dimmed(),
            strategy.optimal_curse_count
        )?;
        writeln!(out, "      {}", strategy.description)?;
    }
    Ok(())
}

pub fn presets(out: &mut impl Write, presets: &FocusPresets) -> io::Result<()> {
    heading(out, "🎯 Focus presets")?;
    for preset in presets.iter() {
        writeln!(
            out,
            "{} {} {}",
            preset.emoji,
            preset.label.bold(),
            format!("({})", preset.id).dimmed()
        )?;
        writeln!(out, "   {}", preset.description)?;
        if !preset.tip.is_empty() {
            writeln!(out, "   {} {}", "Tip:".yellow(), preset.tip)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootrun_core::{Catalog, Loadout, RunRules, SelectionKind};

    fn plain(render: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        render(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn rows_show_markers_and_empty_state() {
        let text = plain(|out| {
            rows(
                out,
                "Boons",
                &[Row {
                    id: "looter".into(),
                    name: "Looter".into(),
                    tag: "mobility".into(),
                    detail: "Faster looting".into(),
                    marker: Some("#1".into()),
                }],
            )
        });
        assert!(text.contains(" #1 Looter [mobility] (looter)"));
        assert!(text.contains("1 shown"));

        let empty = plain(|out| rows(out, "Missions", &[]));
        assert!(empty.contains("No entries match"));
    }

    #[test]
    fn loadout_lists_ranks_warning_and_combos() {
        let catalog = Catalog::default_catalog();
        let mut state = Loadout::new();
        for id in ["jesters_trick", "hoarder", "optimism", "gourmand", "equilibrium"] {
            state.selections.toggle(SelectionKind::Mission, id);
        }
        state.selections.toggle(SelectionKind::Beacon, "grey");
        state.selections.toggle(SelectionKind::Beacon, "aqua");
        let beacons = state.selections.selected(SelectionKind::Beacon).to_vec();
        state.prefs.create_combo("Grey+Aqua", &beacons);

        let view = LoadoutView::new(&state, catalog, &RunRules::default());
        let text = plain(|out| loadout(out, &view));
        assert!(text.contains("#5"));
        assert!(text.contains("5 missions selected; a run only completes 4."));
        assert!(text.contains("1. Grey+Aqua"));
        assert!(!text.contains("Nothing picked yet"));

        let empty_state = Loadout::new();
        let empty = LoadoutView::new(&empty_state, catalog, &RunRules::default());
        assert!(plain(|out| loadout(out, &empty)).contains("Nothing picked yet"));
    }

    #[test]
    fn run_rules_show_limits_and_curse_target() {
        let rules = RunRules::default();
        let text = plain(|out| run_rules(out, &rules, 3, false));
        assert!(text.contains("Missions  3/4 (offered until challenge 30)"));
        assert!(text.contains("up to 2 (offered from challenge 20 to 50)"));
        assert!(text.contains("10 challenges, 15 with a White Beacon"));
        assert!(text.contains("2 choices"));
        assert!(!text.contains("Curse stacking"));

        let stacking = plain(|out| run_rules(out, &rules, 0, true));
        assert!(stacking.contains("aim for 8 curses"));
    }

    #[test]
    fn reference_sections_list_embedded_tables() {
        let catalog = Catalog::default_catalog();
        let challenges = plain(|out| challenge_reference(out, catalog));
        assert!(challenges.contains("  30 Missions stop appearing"));
        assert!(challenges.contains("End Reward Chest"));
        assert!(challenges.contains("Rerolls"));

        let curses = plain(|out| curse_reference(out, catalog));
        assert!(curses.contains("+3 Dark Grey Beacon"));
        assert!(curses.contains("(curse_stacking) target 8"));
    }
}
