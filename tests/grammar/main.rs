mod grammars;
