mod round_unit;
