use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use colored::Colorize;
use std::fmt::Display;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use lootrun_core::{
    CatalogRecord, EmbeddedCatalog, FilterValue, ImportOutcome, Loadout, Planner, SelectionKind,
    ViewFilters, export_file_name,
};

use crate::render::{self, Row};
use crate::workspace::FileStorage;
use crate::{Args, ComboCommand, Command, ListKind};

struct Session {
    planner: Planner<FileStorage>,
    slot: String,
    loadout: Loadout,
}

impl Session {
    fn open(path: &Path) -> Result<Self> {
        let planner = Planner::new(&EmbeddedCatalog, FileStorage)
            .context("failed to load reference data")?;
        let slot = path.to_string_lossy().into_owned();
        let loadout = planner
            .load_loadout(&slot)
            .with_context(|| format!("failed to load working loadout {}", path.display()))?
            .unwrap_or_else(|| {
                log::debug!("no working loadout at {}, starting empty", path.display());
                Loadout::new()
            });
        Ok(Self {
            planner,
            slot,
            loadout,
        })
    }

    fn save(&self) -> Result<()> {
        log::debug!("saving working loadout to {}", self.slot);
        self.planner
            .save_loadout(&self.slot, &self.loadout)
            .with_context(|| format!("failed to save working loadout {}", self.slot))
    }
}

pub fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let mut session = Session::open(&args.loadout)?;
    match &args.command {
        Command::List {
            kind,
            category,
            tier,
            combo,
        } => {
            let filters = view_filters(
                *kind,
                category.as_deref(),
                tier.as_deref(),
                combo.as_deref(),
            )?;
            list(&session, *kind, &filters, out)?;
        }
        Command::Toggle { kind, id } => {
            toggle(&mut session, *kind, id, out)?;
            session.save()?;
        }
        Command::Stat { id } => {
            if !session.planner.catalog().stats.contains(id) {
                unknown_id_note(out, "stat", id)?;
            }
            if session.loadout.prefs.toggle_stat(id) {
                writeln!(out, "Added {} to the overview", id.bold())?;
            } else {
                writeln!(out, "Removed {} from the overview", id.bold())?;
            }
            session.save()?;
        }
        Command::Focus { preset, list } => {
            if *list || preset.is_none() {
                render::presets(out, session.planner.presets())?;
            } else if let Some(preset) = preset {
                if !session.planner.apply_focus(&mut session.loadout, preset) {
                    bail!("no focus preset named `{preset}`");
                }
                writeln!(out, "Applied focus preset {}", preset.bold())?;
                session.save()?;
                let view = session.planner.view(&session.loadout);
                render::loadout(out, &view)?;
            }
        }
        Command::Combo { action } => {
            combo(&mut session, action, out)?;
            session.save()?;
        }
        Command::Show => {
            let view = session.planner.view(&session.loadout);
            render::loadout(out, &view)?;
            render::run_rules(
                out,
                session.planner.rules(),
                session.loadout.selections.len(SelectionKind::Mission),
                stacking_curses(&session),
            )?;
        }
        Command::Export { out: target } => {
            let path = target
                .clone()
                .unwrap_or_else(|| export_file_name(Utc::now().date_naive()).into());
            let document = session.loadout.export();
            FileStorage::write_document(&path, &document)
                .with_context(|| format!("failed to export to {}", path.display()))?;
            writeln!(out, "📦 Exported loadout to {}", path.display())?;
        }
        Command::Import { path } => {
            let bytes =
                std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            let outcome = session
                .loadout
                .import(&bytes)
                .with_context(|| format!("{} could not be parsed", path.display()))?;
            match outcome {
                ImportOutcome::Applied => {
                    session.save()?;
                    writeln!(out, "📥 Imported {}", path.display())?;
                }
                ImportOutcome::UnrecognizedVersion => {
                    writeln!(
                        out,
                        "{}",
                        format!(
                            "{} has an unrecognized save version; loadout left unchanged.",
                            path.display()
                        )
                        .yellow()
                    )?;
                }
            }
        }
        Command::Reset => {
            session.loadout.reset();
            session.save()?;
            writeln!(out, "Loadout cleared")?;
        }
    }
    out.flush()?;
    Ok(())
}

fn parse_filter<T>(flag: &str, raw: Option<&str>, keys: &[T]) -> Result<FilterValue<T>>
where
    T: FromStr + Display + Copy,
{
    let Some(raw) = raw else {
        return Ok(FilterValue::All);
    };
    raw.parse::<FilterValue<T>>()
        .or_else(|_| raw.to_ascii_uppercase().parse())
        .or_else(|_| raw.to_ascii_lowercase().parse())
        .map_err(|_| {
            let expected: Vec<_> = keys.iter().map(ToString::to_string).collect();
            anyhow!(
                "unknown --{flag} `{raw}`; expected all or one of: {}",
                expected.join(", ")
            )
        })
}

fn view_filters(
    kind: ListKind,
    category: Option<&str>,
    tier: Option<&str>,
    combo: Option<&str>,
) -> Result<ViewFilters> {
    let (takes_category, takes_tier, takes_combo) = match kind {
        ListKind::Boons | ListKind::Beacons | ListKind::Stats | ListKind::Curses => {
            (true, false, false)
        }
        ListKind::Missions => (false, true, true),
        ListKind::Trials => (false, true, false),
        ListKind::Camps | ListKind::Challenges => (false, false, false),
    };
    for (flag, given, allowed) in [
        ("category", category.is_some(), takes_category),
        ("tier", tier.is_some(), takes_tier),
        ("combo", combo.is_some(), takes_combo),
    ] {
        if given && !allowed {
            bail!("--{flag} does not apply to {kind:?}");
        }
    }

    let mut filters = ViewFilters::default();
    match kind {
        ListKind::Boons => {
            filters.boon_category =
                parse_filter("category", category, lootrun_core::BoonCategory::ALL)?;
        }
        ListKind::Beacons => {
            filters.beacon_category =
                parse_filter("category", category, lootrun_core::BeaconCategory::ALL)?;
        }
        ListKind::Stats => {
            filters.stat_category =
                parse_filter("category", category, lootrun_core::StatCategory::ALL)?;
        }
        ListKind::Curses => {
            filters.curse_severity =
                parse_filter("category", category, lootrun_core::Severity::ALL)?;
        }
        ListKind::Missions => {
            filters.mission_tier = parse_filter("tier", tier, lootrun_core::Tier::ALL)?;
            filters.mission_combo = parse_filter("combo", combo, lootrun_core::MissionCombo::ALL)?;
        }
        ListKind::Trials => {
            filters.trial_tier = parse_filter("tier", tier, lootrun_core::Tier::ALL)?;
        }
        ListKind::Camps | ListKind::Challenges => {}
    }
    Ok(filters)
}

fn rank_marker(loadout: &Loadout, kind: SelectionKind, id: &str) -> Option<String> {
    match loadout.selections.rank(kind, id) {
        0 => None,
        rank => Some(format!("#{rank}")),
    }
}

fn row<R: CatalogRecord>(record: &R, detail: &str, marker: Option<String>) -> Row {
    Row {
        id: record.id().to_string(),
        name: record.name().to_string(),
        tag: record.category_key().to_string(),
        detail: detail.to_string(),
        marker,
    }
}

fn list(
    session: &Session,
    kind: ListKind,
    filters: &ViewFilters,
    out: &mut impl Write,
) -> Result<()> {
    let catalog = session.planner.catalog();
    let loadout = &session.loadout;
    let (title, rows): (&str, Vec<Row>) = match kind {
        ListKind::Boons => (
            "✨ Boons",
            filters
                .boons(catalog)
                .into_iter()
                .map(|b| row(b, &b.effect, rank_marker(loadout, SelectionKind::Boon, &b.id)))
                .collect(),
        ),
        ListKind::Beacons => (
            "🔆 Beacons",
            filters
                .beacons(catalog)
                .into_iter()
                .map(|b| {
                    let marker = rank_marker(loadout, SelectionKind::Beacon, &b.id);
                    row(b, &b.effect, marker)
                })
                .collect(),
        ),
        ListKind::Missions => (
            "📜 Missions",
            filters
                .missions(catalog)
                .into_iter()
                .map(|m| {
                    let marker = rank_marker(loadout, SelectionKind::Mission, &m.id);
                    row(m, &m.effect, marker)
                })
                .collect(),
        ),
        ListKind::Stats => (
            "📊 Stats",
            filters
                .stats(catalog)
                .into_iter()
                .map(|s| {
                    let marker = loadout
                        .prefs
                        .is_stat_in_overview(&s.id)
                        .then(|| "★".to_string());
                    row(s, "", marker)
                })
                .collect(),
        ),
        ListKind::Trials => (
            "⚔ Trials",
            filters
                .trials(catalog)
                .into_iter()
                .map(|t| row(t, &t.effect, None))
                .collect(),
        ),
        ListKind::Camps => (
            "⛺ Camps",
            catalog
                .camps
                .iter()
                .map(|c| row(c, &format!("{} · {}", c.region, c.difficulty), None))
                .collect(),
        ),
        ListKind::Curses => (
            "☠ Curses",
            filters
                .curses(catalog)
                .into_iter()
                .map(|c| row(c, &c.description, None))
                .collect(),
        ),
        ListKind::Challenges => (
            "🏁 Challenges",
            catalog
                .challenges
                .iter()
                .map(|c| row(c, &c.objective, None))
                .collect(),
        ),
    };
    render::rows(out, title, &rows)?;
    match kind {
        ListKind::Challenges => render::challenge_reference(out, catalog)?,
        ListKind::Curses => render::curse_reference(out, catalog)?,
        _ => {}
    }
    Ok(())
}

/// Whether the picked boons include the curse stacking payoff.
fn stacking_curses(session: &Session) -> bool {
    session
        .planner
        .catalog()
        .curse_strategy("curse_stacking")
        .is_some_and(|strategy| {
            strategy
                .boon_ids
                .iter()
                .any(|id| session.loadout.selections.is_selected(SelectionKind::Boon, id))
        })
}

fn unknown_id_note(out: &mut impl Write, what: &str, id: &str) -> Result<()> {
    writeln!(
        out,
        "{}",
        format!("note: `{id}` is not a known {what}; it is kept but will not be shown").yellow()
    )?;
    Ok(())
}

fn toggle(
    session: &mut Session,
    kind: SelectionKind,
    id: &str,
    out: &mut impl Write,
) -> Result<()> {
    let catalog = session.planner.catalog();
    let known = match kind {
        SelectionKind::Boon => catalog.boons.contains(id),
        SelectionKind::Beacon => catalog.beacons.contains(id),
        SelectionKind::Mission => catalog.missions.contains(id),
    };
    if !known {
        unknown_id_note(out, kind.as_str(), id)?;
    }

    if session.loadout.selections.toggle(kind, id) {
        let rank = session.loadout.selections.rank(kind, id);
        writeln!(out, "Selected {kind} {} at rank #{rank}", id.bold())?;
    } else {
        writeln!(out, "Deselected {kind} {}", id.bold())?;
    }

    if kind == SelectionKind::Mission {
        if let Some(warning) = session.loadout.mission_warning(session.planner.rules()) {
            render::mission_warning(out, &warning)?;
        }
    }
    Ok(())
}

fn combo(session: &mut Session, action: &ComboCommand, out: &mut impl Write) -> Result<()> {
    let prefs = &mut session.loadout.prefs;
    match action {
        ComboCommand::Create { name } => {
            let beacons = session
                .loadout
                .selections
                .selected(SelectionKind::Beacon)
                .to_vec();
            match prefs.create_combo(name, &beacons) {
                Some(combo) => writeln!(
                    out,
                    "Saved combo {} ({}) with {} beacons",
                    combo.name.bold(),
                    combo.id,
                    combo.beacon_ids.len()
                )?,
                None => writeln!(
                    out,
                    "{}",
                    "Nothing saved: give a name and select at least one beacon.".yellow()
                )?,
            }
        }
        ComboCommand::Rename { id, name } => {
            if prefs.rename_combo(id, name) {
                writeln!(out, "Renamed combo {id} to {}", name.trim().bold())?;
            } else {
                writeln!(out, "{}", format!("No combo renamed for `{id}`.").yellow())?;
            }
        }
        ComboCommand::Delete { id } => {
            if prefs.delete_combo(id) {
                writeln!(out, "Deleted combo {id}")?;
            } else {
                writeln!(out, "{}", format!("No combo with id `{id}`.").yellow())?;
            }
        }
        ComboCommand::Move { index, direction } => {
            let moved = index
                .checked_sub(1)
                .is_some_and(|pos| prefs.move_combo(pos, *direction));
            if moved {
                writeln!(out, "Moved combo {index} {direction}")?;
            } else {
                let note = format!("Combo {index} cannot move {direction}.");
                writeln!(out, "{}", note.yellow())?;
            }
        }
    }
    Ok(())
}
