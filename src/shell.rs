//! Interactive prompt loop.
//!
//! Collects a city and month/day selections, prints the statistics, offers
//! the raw rows five at a time, and asks whether to start over. Each round
//! loads the city afresh.

use std::io::{BufRead, Write};

use anyhow::Result;
use bikeshare_explorer::{
    ExploreError,
    aggregator::{Report, users::current_year},
    config::{City, DataConfig},
    filter::{self, FilterSpec, Selection},
    loader::load_city,
    output::{Pager, render_text},
};
use tracing::{error, info};

pub struct Shell<'c, R, W> {
    config: &'c DataConfig,
    input: R,
    output: W,
}

impl<'c, R: BufRead, W: Write> Shell<'c, R, W> {
    pub fn new(config: &'c DataConfig, input: R, output: W) -> Self {
        Self {
            config,
            input,
            output,
        }
    }

    /// Runs rounds until the user declines another or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            if !self.round()? {
                break;
            }
            let again = self.prompt("\nWould you like to view another? Enter yes or no.")?;
            if !again.is_some_and(|a| a.trim().eq_ignore_ascii_case("yes")) {
                break;
            }
        }
        Ok(())
    }

    /// One city/filter query. Returns false when input ended mid-round.
    fn round(&mut self) -> Result<bool> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        let Some(city) = self.ask(
            "What city would you like to view? (Chicago, New York City, Washington)",
            City::resolve,
        )?
        else {
            return Ok(false);
        };
        writeln!(self.output, "You chose: {city}")?;

        let Some(months) = self.ask(
            "What month(s) would you like to view? [January-June, comma-separated, or all]",
            Selection::parse_months,
        )?
        else {
            return Ok(false);
        };
        writeln!(self.output, "You chose months: {months}")?;

        let Some(weekdays) = self.ask(
            "Which day(s) of the week would you like to view? [comma-separated, or all]",
            Selection::parse_weekdays,
        )?
        else {
            return Ok(false);
        };
        writeln!(self.output, "You chose days: {weekdays}")?;

        let spec = FilterSpec::new(months, weekdays);
        info!(city = %city, months = %spec.months, weekdays = %spec.weekdays, "Query selected");

        let store = match load_city(self.config, city) {
            Ok(store) => store,
            Err(e) => {
                error!(error = %e, "Trip data could not be loaded");
                writeln!(self.output, "Could not load {city} data: {e}")?;
                return Ok(true);
            }
        };
        let view = filter::apply(&store, &spec);
        let report = Report::build(&view, current_year());
        write!(self.output, "{}", render_text(&report))?;

        let ask = self.prompt(
            "Would you like to view the raw data? (press enter to view 5 rows at a time, 'q' to pass)",
        )?;
        if ask.as_deref().map(str::trim) == Some("") {
            let mut pager = Pager::new(&view);
            while let Some(page) = pager.next_page()? {
                write!(self.output, "{page}")?;
                match self.prompt("Enter to view the next 5 rows, 'q' to end:")? {
                    Some(answer) if answer.trim().is_empty() => continue,
                    _ => break,
                }
            }
        }

        Ok(true)
    }

    /// Repeats a question until `parse` accepts the answer. Configuration
    /// errors are shown and the question asked again.
    fn ask<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Result<T, ExploreError>,
    ) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.prompt(question)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    /// Prints a question and reads one line; `None` at end of input.
    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        writeln!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
