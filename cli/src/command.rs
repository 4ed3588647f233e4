use anyhow::{Context, Result, bail};
use gridplay_core::{Coord, Coord2};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MinesweeperCommand {
    Reveal(Coord2),
    Flag(Coord2),
    Reset,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConnectFourCommand {
    Drop(Coord),
    Reset,
    Quit,
}

fn parse_coords<'a>(mut words: impl Iterator<Item = &'a str>) -> Result<Coord2> {
    let x = words.next().context("missing x")?;
    let y = words.next().context("missing y")?;
    if let Some(extra) = words.next() {
        bail!("unexpected argument `{extra}`");
    }
    Ok((
        x.parse().with_context(|| format!("bad x `{x}`"))?,
        y.parse().with_context(|| format!("bad y `{y}`"))?,
    ))
}

impl FromStr for MinesweeperCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };
        Ok(match verb {
            "r" | "reveal" => Self::Reveal(parse_coords(words)?),
            "f" | "flag" => Self::Flag(parse_coords(words)?),
            "reset" => Self::Reset,
            "q" | "quit" => Self::Quit,
            other => bail!("unknown command `{other}`, expected r X Y, f X Y, reset or quit"),
        })
    }
}

impl FromStr for ConnectFourCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        Ok(match line.trim() {
            "" => bail!("empty command"),
            "reset" => Self::Reset,
            "q" | "quit" => Self::Quit,
            column => Self::Drop(
                column
                    .parse()
                    .with_context(|| format!("expected a column number, got `{column}`"))?,
            ),
        })
    }
}
