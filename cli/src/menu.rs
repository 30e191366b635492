use catalog_core::{directors, read_description, CatalogIndex, Record};
use std::io::{self, BufRead, Write};

const MAIN_MENU: &str = "1) Search by title\n2) List directors\n3) Search by director\n4) Search by description\n5) Quit\nChoose an option: ";
const PAGE_PROMPT: &str = "Enter a result number to show its description, 0 to return to the main menu, S for the next page or A for the previous page: ";

enum PageAction {
    Back,
    Next,
    Previous,
    Describe(usize),
}

/// Interactive front end over an immutable index.
pub struct Menu<'a, R, W> {
    index: &'a CatalogIndex,
    input: R,
    out: W,
    page_size: usize,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(index: &'a CatalogIndex, input: R, out: W, page_size: usize) -> Self {
        Self { index, input, out, page_size: page_size.max(1) }
    }

    /// Runs until the user quits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        while let Some(choice) = self.ask_number(MAIN_MENU, 1, 5)? {
            let index = self.index;
            match choice {
                1 => {
                    let Some(title) = self.ask("Title: ")? else { break };
                    self.browse(&index.search_title(&title))?;
                }
                2 => self.list_directors()?,
                3 => {
                    let Some(director) = self.ask("Director: ")? else { break };
                    self.browse(&index.search_director(&director))?;
                }
                4 => {
                    let Some(query) = self.ask("Description: ")? else { break };
                    self.browse(&index.search_description(&query))?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Next input line without its line terminator, `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        self.read_line()
    }

    /// Prompt until a number in `lo..=hi` is entered.
    fn ask_number(&mut self, prompt: &str, lo: usize, hi: usize) -> io::Result<Option<usize>> {
        loop {
            let Some(answer) = self.ask(prompt)? else { return Ok(None) };
            match answer.trim().parse::<usize>() {
                Ok(n) if (lo..=hi).contains(&n) => return Ok(Some(n)),
                Ok(_) => writeln!(self.out, "Error: enter a number between {lo} and {hi}")?,
                Err(_) => writeln!(self.out, "Error: enter a number")?,
            }
        }
    }

    fn list_directors(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        for name in directors(self.index) {
            writeln!(self.out, "{name}")?;
        }
        writeln!(self.out)
    }

    fn browse(&mut self, results: &[&Record]) -> io::Result<()> {
        let pages = results.len().div_ceil(self.page_size).max(1);
        let mut page = 1;
        loop {
            self.print_page(results, page, pages)?;
            if results.is_empty() {
                return Ok(());
            }
            let first = (page - 1) * self.page_size + 1;
            let last = (page * self.page_size).min(results.len());
            match self.ask_page_action(first, last)? {
                None | Some(PageAction::Back) => return Ok(()),
                Some(PageAction::Next) => page = (page + 1).min(pages),
                Some(PageAction::Previous) => page = page.saturating_sub(1).max(1),
                Some(PageAction::Describe(n)) => self.describe(results[n - 1])?,
            }
        }
    }

    fn print_page(&mut self, results: &[&Record], page: usize, pages: usize) -> io::Result<()> {
        if results.len() == 1 {
            writeln!(self.out, "\n1 result found. Page 1 of 1.")?;
        } else {
            writeln!(self.out, "\n{} results found. Page {page} of {pages}.", results.len())?;
        }
        let start = (page - 1) * self.page_size;
        for (i, r) in results.iter().enumerate().skip(start).take(self.page_size) {
            writeln!(
                self.out,
                "{}.\t{} ({}).\t{}.\t {} [{}]",
                i + 1,
                r.title,
                r.year,
                r.director,
                r.kind,
                r.source_path.display()
            )?;
        }
        writeln!(self.out)
    }

    fn ask_page_action(&mut self, first: usize, last: usize) -> io::Result<Option<PageAction>> {
        loop {
            let Some(answer) = self.ask(PAGE_PROMPT)? else { return Ok(None) };
            let answer = answer.trim();
            match answer {
                "S" | "s" | "N" | "n" => return Ok(Some(PageAction::Next)),
                "A" | "a" | "P" | "p" => return Ok(Some(PageAction::Previous)),
                _ => {}
            }
            match answer.parse::<usize>() {
                Ok(0) => return Ok(Some(PageAction::Back)),
                Ok(n) if (first..=last).contains(&n) => return Ok(Some(PageAction::Describe(n))),
                Ok(_) => writeln!(self.out, "Error: enter a number between {first} and {last}, 0, A or S")?,
                Err(_) => writeln!(self.out, "Error: enter a number, A or S")?,
            }
        }
    }

    fn describe(&mut self, record: &Record) -> io::Result<()> {
        match read_description(record) {
            Ok(Some(text)) => writeln!(self.out, "\n{text}"),
            Ok(None) => writeln!(self.out, "\nNo description found for record {}.", record.id),
            Err(e) => {
                tracing::warn!(id = %record.id, error = %e, "could not read description");
                writeln!(self.out, "\nError: could not read the description: {e}")
            }
        }
    }
}
