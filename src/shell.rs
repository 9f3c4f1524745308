use std::{
    io::{self, Write},
    num::ParseIntError,
    path::Path,
};

use colored::Colorize;
use thiserror::Error;
use tracing::debug;

use crate::bank::{Account, Bank, Customer, LookupError};
use crate::money::format_money;

pub const PROMPT: &str = "bank> ";

/// Keywords offered for completion, in the order `help` lists them.
pub const COMMANDS: [&str; 5] = ["help", "customers", "customer", "report", "exit"];

const DETAIL_KEYWORD: &str = "customer";
const HINT: &str = "For assistance press TAB or type \"help\" then hit ENTER.";
const ACCOUNT_HEADER: &str = "\nLast name\tFirst Name\tAccount Type\tBalance";
const REPORT_RULE: &str = "-------------------------------------------------------";

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("console output failed: {0}")]
    Io(#[from] io::Error),
    #[error("line editor failed: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetailError {
    #[error("no customer number after the command")]
    MissingIndex,
    #[error("customer number is not an integer: {0}")]
    InvalidIndex(#[from] ParseIntError),
    #[error("customer number {0} is negative")]
    NegativeIndex(i32),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Where the loop gets its input. `None` means end of input or interrupt.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Customers,
    Report,
    /// Holds the whole line; the index is pulled out of it on execution.
    CustomerDetail(&'a str),
    Exit,
    Invalid,
}

impl<'a> Command<'a> {
    /// `line` is expected to be trimmed already. Matching is
    /// case-sensitive and the first rule that applies wins.
    pub fn parse(line: &'a str) -> Self {
        match line {
            "help" => Command::Help,
            "customers" => Command::Customers,
            "report" => Command::Report,
            _ if line.contains(DETAIL_KEYWORD) => Command::CustomerDetail(line),
            "exit" => Command::Exit,
            _ => Command::Invalid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/**
 * Extracts the customer number from a detail command line.
 *
 * The line is split on single spaces and the second token is the number,
 * so "customer5" and "customer  5" both fail while "customer 1 2" picks 1.
 * A bare "customer" means customer 0.
 */
pub fn detail_index(line: &str) -> Result<usize, DetailError> {
    if line.encode_utf16().count() <= DETAIL_KEYWORD.len() {
        return Ok(0);
    }
    let token = line.split(' ').nth(1).ok_or(DetailError::MissingIndex)?;
    let number: i32 = token.parse()?;
    usize::try_from(number).map_err(|_| DetailError::NegativeIndex(number))
}

fn customer_detail<'b>(
    bank: &'b Bank,
    line: &str,
) -> Result<(usize, &'b Customer, &'b Account), DetailError> {
    let index = detail_index(line)?;
    let customer = bank.customer(index)?;
    let account = customer.account(0)?;
    Ok((index, customer, account))
}

pub struct Shell<'a> {
    bank: &'a Bank,
}

impl<'a> Shell<'a> {
    pub fn new(bank: &'a Bank) -> Self {
        Shell { bank }
    }

    pub fn execute<W: Write>(&self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = Command::parse(line);
        debug!(?command, "dispatching");

        match command {
            Command::Help => self.help(out)?,
            Command::Customers => self.customers(out)?,
            Command::Report => self.report(out)?,
            Command::CustomerDetail(line) => self.customer_detail(line, out)?,
            Command::Exit => {
                writeln!(out, "Exiting application")?;
                return Ok(Flow::Exit);
            }
            Command::Invalid => {
                let message = format!("Invalid command, {}", HINT);
                writeln!(out, "{}", message.as_str().red())?;
            }
        }
        Ok(Flow::Continue)
    }

    fn help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "help\t\t\t- Show help")?;
        writeln!(out, "customers\t\t- Show list of customers")?;
        writeln!(out, "customer 'index'\t- Show customer details")?;
        writeln!(out, "report\t\t\t- Show detailed report of customers")?;
        writeln!(out, "exit\t\t\t- Exit the app")
    }

    fn customers<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\nThis is all of your {}:", "customers".red().bold())?;
        if self.bank.is_empty() {
            return write_no_customers(out);
        }

        writeln!(out, "\nLast name\tFirst Name\tBalance")?;
        for customer in self.bank.customers() {
            writeln!(
                out,
                "{}\t\t{}\t\t{}",
                customer.last_name(),
                customer.first_name(),
                format_money(customer.total_balance())
            )?;
        }
        Ok(())
    }

    fn report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\nThis is the report of all {}:", "customers".red().bold())?;
        if self.bank.is_empty() {
            return write_no_customers(out);
        }

        writeln!(out, "{}", ACCOUNT_HEADER)?;
        writeln!(out, "{}", REPORT_RULE)?;
        for customer in self.bank.customers() {
            for account in customer.accounts() {
                write_account_row(out, customer, account)?;
            }
        }
        Ok(())
    }

    fn customer_detail<W: Write>(&self, line: &str, out: &mut W) -> io::Result<()> {
        match customer_detail(self.bank, line) {
            Ok((index, customer, account)) => {
                writeln!(
                    out,
                    "\nThis is detailed information about customer #{}!",
                    index.to_string().as_str().red().bold()
                )?;
                writeln!(out, "{}", ACCOUNT_HEADER)?;
                write_account_row(out, customer, account)
            }
            Err(err) => {
                debug!(line, error = %err, "customer lookup failed");
                writeln!(out, "{}", "ERROR! Wrong customer number!".red())
            }
        }
    }
}

fn write_account_row<W: Write>(
    out: &mut W,
    customer: &Customer,
    account: &Account,
) -> io::Result<()> {
    writeln!(
        out,
        "{}\t\t{}\t\t{}\t{}",
        customer.last_name(),
        customer.first_name(),
        account.kind(),
        format_money(account.balance())
    )
}

fn write_no_customers<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "Your bank has no customers!".red())
}

pub fn write_welcome<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "\nWelcome to {}! \n{}",
        " MyBank Console Client App".green(),
        HINT
    )
}

pub fn write_load_error<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    let message = format!("ERROR! Could not read from file: {}", path.display());
    writeln!(out, "{}", message.as_str().red())
}

/// Strips space and control characters from both ends. Other whitespace,
/// such as a no-break space, is part of the command.
pub fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c <= ' ')
}

/**
 * Runs the command loop until `exit` or the end of input. Each line is
 * trimmed and fully handled, output flushed, before the next read.
 */
pub fn run<S: LineSource, W: Write>(
    bank: &Bank,
    input: &mut S,
    out: &mut W,
) -> Result<(), ShellError> {
    let shell = Shell::new(bank);
    write_welcome(out)?;

    loop {
        writeln!(out)?;
        out.flush()?;
        let Some(line) = input.read_line(PROMPT)? else {
            debug!("input closed");
            return Ok(());
        };
        if shell.execute(trim_line(&line), out)? == Flow::Exit {
            return Ok(());
        }
    }
}
