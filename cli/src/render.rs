use anyhow::Result;
use gridplay_core::connect_four::{ConnectFour, ConnectFourStatus, PieceColor};
use gridplay_core::minesweeper::{Board, CellView, Observation};
use std::io::Write;

fn cell_glyph(view: CellView) -> char {
    match view {
        CellView::Hidden => '#',
        CellView::Flagged => 'F',
        CellView::Mine => '*',
        CellView::Revealed(0) => '.',
        CellView::Revealed(count) => char::from(b'0' + count),
    }
}

fn piece_glyph(piece: PieceColor) -> char {
    match piece {
        PieceColor::Blank => '.',
        PieceColor::Red => 'R',
        PieceColor::Yellow => 'Y',
    }
}

pub fn minesweeper(board: &Board, json: bool, out: &mut impl Write) -> Result<()> {
    let obs = Observation::from_board(board);
    if json {
        serde_json::to_writer(&mut *out, &obs)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{:?}  mines left: {}  time: {}s",
        obs.status, obs.mines_remaining, obs.elapsed_secs
    )?;
    let (width, height) = obs.size;
    for y in 1..=height {
        let line: String = (1..=width)
            .filter_map(|x| obs.cell((x, y)))
            .map(cell_glyph)
            .collect();
        writeln!(out, "{line}")?;
    }
    Ok(())
}

pub fn connect_four(board: &ConnectFour, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, board)?;
        writeln!(out)?;
        return Ok(());
    }

    for row in board.rows() {
        let line: String = row.map(piece_glyph).collect();
        writeln!(out, "{line}")?;
    }
    writeln!(out, "0123456")?;
    match board.status() {
        ConnectFourStatus::InProgress => writeln!(out, "{:?} to move", board.current_turn())?,
        ConnectFourStatus::Won(player) => writeln!(out, "{player:?} wins")?,
        ConnectFourStatus::Draw => writeln!(out, "Draw")?,
    }
    Ok(())
}
